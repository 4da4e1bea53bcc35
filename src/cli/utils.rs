use serde_json::{json, Value};
use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&success_json(message, data))?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

fn success_json(message: &str, data: Option<Value>) -> Value {
    let mut response = json!({
        "success": true,
        "message": message
    });

    if let (Some(target), Some(Value::Object(extra))) = (response.as_object_mut(), data) {
        target.extend(extra);
    }

    response
}

/// Output a warning line that does not abort the command
pub fn output_warning(output_format: &OutputFormat, message: &str) {
    match output_format {
        OutputFormat::Json => {
            eprintln!("{}", json!({ "warning": message }));
        }
        OutputFormat::Text => {
            eprintln!("! {}", message);
        }
    }
}
