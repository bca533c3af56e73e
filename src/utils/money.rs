/// Formats an amount in rupiah with `.` as the thousands separator, e.g. `Rp 105.600`.
pub fn format_rupiah(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("Rp {}", grouped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_rupiah() {
        assert_eq!(format_rupiah(0), "Rp 0");
        assert_eq!(format_rupiah(500), "Rp 500");
        assert_eq!(format_rupiah(2000), "Rp 2.000");
        assert_eq!(format_rupiah(105600), "Rp 105.600");
        assert_eq!(format_rupiah(1234567), "Rp 1.234.567");
    }
}
