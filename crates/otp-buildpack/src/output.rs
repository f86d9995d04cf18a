//! Terminal output utilities

use console::style;
use otp_layer::LayerEnv;

/// Print the buildpack title line
pub fn title(name: &str, version: &str) {
    println!("{} {}", style(name).bold(), version);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", style(key).dim(), value);
}

/// Print the environment a layer contributes
pub fn environment(env: &LayerEnv) {
    if env.is_empty() {
        return;
    }

    println!("  {}", style("Configuring build and launch environment").bold());
    for line in environment_lines(env) {
        println!("    {}", line);
    }
}

/// `NAME -> value` lines for each variable in `env`
fn environment_lines(env: &LayerEnv) -> Vec<String> {
    let mut lines = Vec::new();
    for (file_name, value) in env.files() {
        let Some((name, action)) = file_name.rsplit_once('.') else {
            continue;
        };
        match action {
            "default" | "override" => lines.push(format!("{} -> \"{}\"", name, value)),
            "prepend" => {
                let delim = env.get(&format!("{}.delim", name)).unwrap_or(":");
                lines.push(format!("{} -> \"{}{}${}\"", name, value, delim, name));
            }
            _ => {}
        }
    }
    lines
}
