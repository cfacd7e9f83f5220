//! Seriais de sensores.
//!
//! Nas leituras o serial é inteiro; nos registros de configuração o
//! dispositivo o transmite como texto hexadecimal minúsculo, sem zeros à
//! esquerda nem prefixo.

/// Formata um serial como o dispositivo faz (`1a2b`).
pub fn format_serial(serial: u64) -> String {
    format!("{serial:x}")
}

/// Lê um serial hexadecimal. Aceita prefixo `0x` e maiúsculas.
pub fn parse_serial(text: &str) -> Option<u64> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return None;
    }
    u64::from_str_radix(digits, 16).ok()
}
