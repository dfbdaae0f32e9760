//! Run with: cargo run -p aisaka-parse --example parse -- <filename>...
//!
//! Parses each argument as a release filename and prints the elements as
//! JSON.

fn main() {
    let filenames: Vec<String> = std::env::args().skip(1).collect();
    if filenames.is_empty() {
        eprintln!("usage: parse <filename>...");
        return;
    }

    for filename in &filenames {
        let elements = aisaka_parse::parse(filename);
        match serde_json::to_string_pretty(&elements) {
            Ok(json) => println!("{json}"),
            Err(err) => eprintln!("{filename}: {err}"),
        }
    }
}
