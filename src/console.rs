//! Helpers for the human-readable report printed on stdout.

pub const SECTION_WIDTH: usize = 50;
pub const SUMMARY_WIDTH: usize = 60;

pub fn rule(width: usize) -> String {
    "=".repeat(width)
}

pub fn print_section(title: &str, width: usize) {
    println!("\n{}", rule(width));
    println!("{}", title);
    println!("{}", rule(width));
}

/// Formats an integer with `,` grouping, e.g. `12,345`.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
