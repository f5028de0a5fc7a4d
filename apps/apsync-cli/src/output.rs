//! Terminal output helpers for consistent CLI formatting.

/// Check if color output is enabled
fn use_color() -> bool {
    std::env::var("NO_COLOR").is_err()
}

/// Print a success message (green checkmark)
pub fn print_success(message: &str) {
    if use_color() {
        println!("\x1b[32m✓\x1b[0m {}", message);
    } else {
        println!("OK: {}", message);
    }
}

/// Print an info message (blue)
pub fn print_info(message: &str) {
    if use_color() {
        println!("\x1b[34mℹ\x1b[0m {}", message);
    } else {
        println!("Info: {}", message);
    }
}

/// Print a warning message (yellow)
pub fn print_warning(message: &str) {
    if use_color() {
        eprintln!("\x1b[33mWarning:\x1b[0m {}", message);
    } else {
        eprintln!("Warning: {}", message);
    }
}

/// Print an error message (red)
pub fn print_error(message: &str) {
    if use_color() {
        eprintln!("\x1b[31mError:\x1b[0m {}", message);
    } else {
        eprintln!("Error: {}", message);
    }
}
