//! Customer name extraction.

/// Find the customer name: the text after the first colon of the first
/// line containing `marker`, up to the next colon.
///
/// Only the first marker line is considered, even if it yields an empty
/// name.
pub fn extract_customer(text: &str, marker: &str) -> Option<String> {
    let line = text.lines().find(|line| line.contains(marker))?;
    let name = line.split(':').nth(1)?.trim();

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MARKER: &str = "Cliente:";

    #[test]
    fn test_extract_customer() {
        let text = "PEDIDO 1234\nCliente: Padaria Central \nData: 01/02/2024";
        assert_eq!(
            extract_customer(text, MARKER),
            Some("Padaria Central".to_string())
        );
    }

    #[test]
    fn test_first_marker_wins() {
        let text = "Cliente: Mercado A\n1 Bread 1 UN R$ 1,00 ----- R$ 1,00\nCliente: Mercado B";
        assert_eq!(extract_customer(text, MARKER), Some("Mercado A".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let text = "foo\nCliente: Mercado A\nCliente: Mercado B";
        assert_eq!(extract_customer(text, MARKER), extract_customer(text, MARKER));
        assert_eq!(extract_customer("nothing here", MARKER), None);
        assert_eq!(extract_customer("nothing here", MARKER), None);
    }

    #[test]
    fn test_stops_at_next_colon() {
        let text = "Cliente: Mercado A   CNPJ: 12.345.678/0001-90";
        assert_eq!(
            extract_customer(text, MARKER),
            Some("Mercado A   CNPJ".to_string())
        );
    }

    #[test]
    fn test_empty_name() {
        let text = "Cliente:   \nCliente: Mercado B";
        assert_eq!(extract_customer(text, MARKER), None);
    }
}
