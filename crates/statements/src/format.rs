use chitledger_core::Money;

/// Format an amount as rupees with Indian digit grouping, e.g.
/// `₹1,23,456.50`. The last three digits form one group, every group above
/// that has two.
pub fn format_rupees(amount: Money) -> String {
    let paise = amount.as_paise();
    let sign = if paise < 0 { "-" } else { "" };
    let abs = paise.unsigned_abs();
    format!("{}₹{}.{:02}", sign, group_indian(abs / 100), abs % 100)
}

fn group_indian(whole: u64) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let bytes = head.as_bytes();
    let mut end = bytes.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
