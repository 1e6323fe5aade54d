//! `doc-get`: print the subtree of a YAML or JSON document at a key path.
//!
//! Usage:
//!   doc-get [--json] [--pretty] [KEY...]
//!
//! The document is read from stdin. Keys that parse as integers index into
//! sequences. Missing subtrees print as `null`.

use simple_doc::cli::lookup_path;
use simple_doc::Format;
use std::io::{self, Read, Write};

fn main() {
    let mut format = Format::Yaml;
    let mut pretty = false;
    let mut path = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--json" => format = Format::Json,
            "--pretty" => pretty = true,
            _ => path.push(arg),
        }
    }

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    match lookup_path(&buf, format, pretty, &path) {
        Ok(result) => {
            let mut stdout = io::stdout();
            if let Err(e) = writeln!(stdout, "{result}") {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
