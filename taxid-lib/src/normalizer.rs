use serde_json::{Number, Value};

/// Reduce a raw cell value to the digits it contains.
///
/// Absent or "empty" values (`null`, `""`, `false`, `0`) produce an empty
/// string. Anything else is rendered as text and stripped of every character
/// that is not an ASCII digit, keeping the order of the remaining digits.
pub fn normalize(value: &Value) -> String {
    match value {
        // `true` renders as text without digits
        Value::Null | Value::Bool(_) => String::new(),
        Value::String(s) => normalize_str(s),
        Value::Number(n) if is_zero(n) => String::new(),
        Value::Number(n) => normalize_str(&render_number(n)),
        // Nested values never come out of a spreadsheet cell, but keep the function total
        Value::Array(_) | Value::Object(_) => normalize_str(&value.to_string()),
    }
}

/// Strip every non ASCII digit character from `value`.
pub fn normalize_str(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

fn is_zero(n: &Number) -> bool {
    n.as_f64().is_some_and(|f| f == 0.0)
}

/// Integral floats are rendered without the fractional part so that a
/// document typed as a number (`11144477735.0`) keeps exactly its digits.
/// Below 1e21 this is plain positional notation; serde_json would switch to
/// an exponent (`1e16`) and drop digits.
fn render_number(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }

    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e21 => format!("{:.0}", f),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_formatted_cpf() {
        assert_eq!(normalize(&json!("123.456.789-09")), "12345678909");
    }

    #[test]
    fn test_normalize_formatted_cnpj() {
        assert_eq!(normalize(&json!("11.222.333/0001-81")), "11222333000181");
    }

    #[test]
    fn test_normalize_empty_values() {
        assert_eq!(normalize(&json!("")), "");
        assert_eq!(normalize(&Value::Null), "");
        assert_eq!(normalize(&json!(false)), "");
        assert_eq!(normalize(&json!(0)), "");
        assert_eq!(normalize(&json!(0.0)), "");
    }

    #[test]
    fn test_normalize_numeric_cells() {
        assert_eq!(normalize(&json!(11144477735_i64)), "11144477735");
        assert_eq!(normalize(&json!(11144477735.0)), "11144477735");
        assert_eq!(normalize(&json!(12.5)), "125");
    }

    #[test]
    fn test_normalize_large_integral_floats() {
        assert_eq!(normalize(&json!(1e16)), "10000000000000000");
        assert_eq!(normalize(&json!(11222333000181.0)), "11222333000181");
        assert_eq!(normalize(&json!(1e20)), "100000000000000000000");
    }

    #[test]
    fn test_normalize_text_without_digits() {
        assert_eq!(normalize(&json!("não informado")), "");
        assert_eq!(normalize(&json!(true)), "");
    }

    #[test]
    fn test_normalize_ignores_non_ascii_digits() {
        // Arabic-Indic digits are not ASCII digits
        assert_eq!(normalize_str("١٢٣-456"), "456");
    }
}
