use crate::support::{print_json_or_exit, read_document_or_exit, registry_or_exit};
use mbent_kernel::DecodeError;
use serde_json::json;

pub fn run(file: String, json_output: bool) {
    let registry = registry_or_exit();
    let document = read_document_or_exit(&file);

    let entries = match registry.decode_document(&document) {
        Ok(entries) => entries,
        Err(err) => {
            if json_output {
                print_json_or_exit(
                    &json!({
                        "file": file,
                        "ok": false,
                        "document_error": err.to_string(),
                    }),
                    "check",
                );
            } else {
                eprintln!("error: {file}: {err}");
            }
            std::process::exit(1);
        }
    };

    let issues: Vec<(usize, String)> = entries
        .iter()
        .filter_map(|entry| entry.as_ref().err())
        .map(|err| match err {
            DecodeError::Entry { position, source } => (*position, source.to_string()),
            other => (0, other.to_string()),
        })
        .collect();
    let drive_count = entries.len();
    let valid_count = drive_count - issues.len();

    if json_output {
        let rows: Vec<_> = issues
            .iter()
            .map(|(position, error)| json!({ "position": position, "error": error }))
            .collect();
        print_json_or_exit(
            &json!({
                "file": file,
                "ok": issues.is_empty(),
                "drive_count": drive_count,
                "valid_count": valid_count,
                "issues": rows,
            }),
            "check",
        );
    } else {
        println!("mbent check {file}");
        println!("  Drives: {drive_count}");
        println!("  Valid: {valid_count}");
        if issues.is_empty() {
            println!("  Issues: none");
        } else {
            println!("  Issues:");
            for (position, error) in &issues {
                println!("    - drives[{position}]: {error}");
            }
        }
    }

    if !issues.is_empty() {
        std::process::exit(1);
    }
}
