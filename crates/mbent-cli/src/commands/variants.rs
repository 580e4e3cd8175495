use crate::support::{print_json_or_exit, registry_or_exit};
use mbent_kernel::{EntitySchema, describe};

pub fn run(json_output: bool) {
    let registry = registry_or_exit();
    let variants: Vec<EntitySchema> = registry.declarations().map(describe).collect();

    if json_output {
        print_json_or_exit(&variants, "variants");
        return;
    }

    println!("mbent variants");
    for variant in &variants {
        let fields: Vec<String> = variant
            .fields
            .iter()
            .map(|field| {
                if field.required {
                    field.name.to_string()
                } else {
                    format!("[{}]", field.name)
                }
            })
            .collect();
        println!(
            "  {:<8} {:<18} {}",
            variant.type_tag.unwrap_or("-"),
            variant.type_name,
            fields.join(", ")
        );
    }
}
