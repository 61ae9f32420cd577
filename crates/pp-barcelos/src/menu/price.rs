use crate::Region;

/// Format a whole-unit price the way the regional site displays it.
///
/// India groups digits as lakhs and crores (`₹1,23,456`), South Africa uses
/// space-separated thousands (`R1 299`).
pub fn format_price(amount: u32, region: Region) -> String {
    let digits = amount.to_string();
    let grouped = match region {
        Region::India => group_indian(&digits),
        Region::SouthAfrica => group_thousands(&digits, ' '),
    };
    format!("{}{}", region.currency_symbol(), grouped)
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(separator);
        }
        out.push(ch);
    }
    out
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut out = String::with_capacity(digits.len() + digits.len() / 2);
    for (i, ch) in head.chars().enumerate() {
        if i > 0 && (head.len() - i) % 2 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push(',');
    out.push_str(tail);
    out
}
