use std::str::FromStr;

use cosmwasm_std::Uint256;

use crate::error::FormError;

/// Canonical short form of a hex address: lower case, leading zeros
/// stripped, at least one digit kept.
pub fn normalize_address(address: &str) -> String {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed.to_ascii_lowercase())
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Normalise every address inside a Move type tag, generic arguments
/// included: `0x000..3::gas_coin::RGas` becomes `0x3::gas_coin::RGas`.
pub fn normalize_coin_type(coin_type: &str) -> String {
    let mut out = String::with_capacity(coin_type.len());
    let mut rest = coin_type.trim();
    let mut prev: Option<char> = None;

    while let Some(ch) = rest.chars().next() {
        let starts_address = ch == '0'
            && !prev.is_some_and(is_ident_char)
            && rest[1..].starts_with(|c: char| c == 'x' || c == 'X');
        if starts_address {
            let digits = rest[2..]
                .find(|c: char| !c.is_ascii_hexdigit())
                .unwrap_or(rest.len() - 2);
            let token = &rest[..2 + digits];
            out.push_str(&normalize_address(token));
            prev = token.chars().last();
            rest = &rest[token.len()..];
            continue;
        }
        out.push(ch);
        prev = Some(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Contents of the outermost `<...>` of a type tag.
pub fn generic_argument(type_tag: &str) -> Option<&str> {
    let open = type_tag.find('<')?;
    let mut depth = 0usize;
    for (i, c) in type_tag[open..].char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    return Some(type_tag[open + 1..open + i].trim());
                }
            }
            _ => {}
        }
    }
    None
}

/// The coin type held by a `CoinStore<T>`, possibly wrapped in `Object<..>`.
pub fn coin_type_from_store(type_tag: &str) -> Option<String> {
    let at = type_tag.find("CoinStore<")?;
    generic_argument(&type_tag[at..]).map(normalize_coin_type)
}

/// Render an integer amount with `decimals` fractional digits, dropping
/// trailing zeros.
pub fn format_units(amount: Uint256, decimals: u8) -> String {
    let raw = amount.to_string();
    let decimals = decimals as usize;
    if decimals == 0 {
        return raw;
    }
    let padded = format!("{:0>width$}", raw, width = decimals + 1);
    let (int, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        int.to_string()
    } else {
        format!("{}.{}", int, frac)
    }
}

/// Parse a human decimal string into an integer amount with `decimals`
/// fractional digits.
pub fn parse_units(input: &str, decimals: u8) -> Result<Uint256, FormError> {
    let invalid = || FormError::InvalidAmount {
        input: input.to_string(),
    };
    let text = input.trim();
    let (int, frac) = match text.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (text, ""),
    };
    if int.is_empty() && frac.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(int) || !all_digits(frac) || frac.len() > decimals as usize {
        return Err(invalid());
    }
    let combined = format!("{}{:0<width$}", int, frac, width = decimals as usize);
    let combined = combined.trim_start_matches('0');
    if combined.is_empty() {
        return Ok(Uint256::zero());
    }
    Uint256::from_str(combined).map_err(|_| invalid())
}
