use crate::config::SchemaConfig;
use crate::support::{print_json_or_exit, registry_or_exit};
use mbent_kernel::{SchemaOptions, json_schema_document};
use serde_json::json;
use std::path::Path;

pub struct Args {
    pub out: Option<String>,
    pub marker: Option<String>,
    pub title: Option<String>,
    pub json: bool,
}

pub fn run(args: Args, config: &SchemaConfig) {
    let registry = registry_or_exit();
    let mut options = SchemaOptions::default();
    if let Some(title) = args.title.or_else(|| config.title.clone()) {
        options.title = title;
    }
    options.marker = args.marker.or_else(|| config.marker.clone());
    let document = json_schema_document(registry, &options);

    let Some(out) = args.out.or_else(|| config.path.clone()) else {
        print_json_or_exit(&document, "schema");
        return;
    };

    let rendered = serde_json::to_string_pretty(&document).unwrap_or_else(|err| {
        eprintln!("error: failed to render schema json: {err}");
        std::process::exit(2);
    });
    let path = Path::new(&out);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).unwrap_or_else(|err| {
            eprintln!("error: failed to create {}: {err}", parent.display());
            std::process::exit(2);
        });
    }
    std::fs::write(path, format!("{rendered}\n")).unwrap_or_else(|err| {
        eprintln!("error: failed to write {out}: {err}");
        std::process::exit(2);
    });
    tracing::info!(path = %out, "schema written");

    let variant_count = registry.tags().len();
    if args.json {
        print_json_or_exit(
            &json!({
                "path": out,
                "variant_count": variant_count,
                "marker": options.marker,
            }),
            "schema summary",
        );
    } else {
        println!("mbent schema");
        println!("  Path: {out}");
        println!("  Variants: {variant_count}");
        if let Some(marker) = &options.marker {
            println!("  Marker: {marker}");
        }
    }
}
