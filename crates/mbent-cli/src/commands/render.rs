use crate::support::{read_document_or_exit, registry_or_exit};
use mbent_kernel::Entity;

pub fn run(file: String, keep_going: bool) {
    let registry = registry_or_exit();
    let document = read_document_or_exit(&file);
    let entries = registry.decode_document(&document).unwrap_or_else(|err| {
        eprintln!("error: {file}: {err}");
        std::process::exit(1);
    });

    if !keep_going {
        if let Some(Err(err)) = entries.iter().find(|entry| entry.is_err()) {
            eprintln!("error: {file}: {err}");
            std::process::exit(1);
        }
    }

    let mut failed = 0;
    for entry in &entries {
        match entry {
            Ok(drive) => println!("{}", drive.serialize()),
            Err(err) => {
                failed += 1;
                eprintln!("error: {file}: {err}");
            }
        }
    }
    if failed > 0 {
        tracing::warn!(failed, total = entries.len(), "some drives were not rendered");
        std::process::exit(1);
    }
}
