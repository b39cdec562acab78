//! Plain scalar typing, following the YAML 1.2 core schema with the
//! exponent-only float forms (`1e-4`) that training configs rely on.

use super::node::Node;

pub fn resolve_plain(text: &str) -> Node {
	if is_null(text) {
		return Node::Null;
	}
	if let Some(b) = parse_bool(text) {
		return Node::Bool(b);
	}
	if let Some(int) = parse_int(text) {
		// out of range integers keep their text
		return int.map(Node::Int).unwrap_or_else(|| Node::Str(text.to_string()));
	}
	if let Some(f) = parse_float(text) {
		return Node::Float(f);
	}
	Node::Str(text.to_string())
}

fn is_null(text: &str) -> bool {
	matches!(text, "" | "~" | "null" | "Null" | "NULL")
}

fn parse_bool(text: &str) -> Option<bool> {
	match text {
		"true" | "True" | "TRUE" => Some(true),
		"false" | "False" | "FALSE" => Some(false),
		_ => None,
	}
}

/// `None` when the text is not integer-shaped, `Some(None)` when it is but
/// does not fit in an `i64`.
fn parse_int(text: &str) -> Option<Option<i64>> {
	let (digits, radix) = if let Some(hex) = text.strip_prefix("0x") {
		(hex, 16)
	} else if let Some(oct) = text.strip_prefix("0o") {
		(oct, 8)
	} else {
		let unsigned = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(text);
		if unsigned.is_empty() || !unsigned.bytes().all(|b| b.is_ascii_digit()) {
			return None;
		}
		return Some(text.parse::<i64>().ok());
	};
	if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
		return None;
	}
	Some(i64::from_str_radix(digits, radix).ok())
}

fn parse_float(text: &str) -> Option<f64> {
	match text {
		".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => return Some(f64::INFINITY),
		"-.inf" | "-.Inf" | "-.INF" => return Some(f64::NEG_INFINITY),
		".nan" | ".NaN" | ".NAN" => return Some(f64::NAN),
		_ => {}
	}

	let unsigned = text.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(text);
	let (mantissa, exponent) = match unsigned.find(|c: char| c == 'e' || c == 'E') {
		Some(pos) => (&unsigned[..pos], Some(&unsigned[pos + 1..])),
		None => (unsigned, None),
	};

	let mut parts = mantissa.splitn(2, '.');
	let whole = parts.next().unwrap_or("");
	let fraction = parts.next();
	let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
	if !all_digits(whole) || !fraction.map_or(true, all_digits) {
		return None;
	}
	// at least one digit in the mantissa
	if whole.is_empty() && fraction.map_or(true, str::is_empty) {
		return None;
	}
	if let Some(exp) = exponent {
		let exp_digits = exp.strip_prefix(|c: char| c == '-' || c == '+').unwrap_or(exp);
		if exp_digits.is_empty() || !all_digits(exp_digits) {
			return None;
		}
	}

	text.parse::<f64>().ok()
}
