//! Regex patterns for supplier order documents.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Order line with a product name between id and quantity:
    // "7 Pão de Forma 2,5 KG R$ 10,00 ----- R$ 25,00"
    pub static ref NAMED_ORDER_LINE: Regex = Regex::new(
        r"(?P<id>\d+)\s+(?P<name>.*?)\s+(?P<quantity>\d+,?\d*(?:\s*[gG])?)\s*(?P<unit>UN|UND|KG|kg|Kg|G|g|Un|Und|un|und)?\s+R\$\s*\d+,\d+\s+-----\s+R\$\s*\d+,\d+"
    ).unwrap();

    // Order line without a name: "7 2,5 KG R$ 10,00 ----- R$ 25,00"
    pub static ref UNNAMED_ORDER_LINE: Regex = Regex::new(
        r"(?P<id>\d+)\s+(?P<quantity>\d+,?\d*)\s*(?P<unit>UN|UND|KG|kg|Kg|G|g|Un|Und|un|und)\s+R\$\s*\d+,\d+\s+-----\s+R\$\s*\d+,\d+"
    ).unwrap();

    // Gram suffix glued to a quantity token ("500g", "500 G")
    pub static ref GRAM_SUFFIX: Regex = Regex::new(
        r"\s*[gG]$"
    ).unwrap();

    // Label description: "heading: body. validity"
    pub static ref LABEL_DESCRIPTION: Regex = Regex::new(
        r"(?m)^(?P<heading>.*?)(?::|\.)\s*(?P<body>.*?)(?::|\.)\s*(?P<validity>.*?)$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_order_line() {
        let caps = NAMED_ORDER_LINE
            .captures("7 Bread 2,5 KG R$ 10,00 ----- R$ 25,00")
            .unwrap();
        assert_eq!(&caps["id"], "7");
        assert_eq!(&caps["name"], "Bread");
        assert_eq!(&caps["quantity"], "2,5");
        assert_eq!(&caps["unit"], "KG");
    }

    #[test]
    fn test_named_order_line_multiword_name() {
        let caps = NAMED_ORDER_LINE
            .captures("012 Pão de Forma Integral 10 UND R$ 7,50 ----- R$ 75,00")
            .unwrap();
        assert_eq!(&caps["id"], "012");
        assert_eq!(&caps["name"], "Pão de Forma Integral");
        assert_eq!(&caps["quantity"], "10");
        assert_eq!(&caps["unit"], "UND");
    }

    #[test]
    fn test_unnamed_order_line() {
        let line = "7 2,5 KG R$ 10,00 ----- R$ 25,00";
        assert!(!NAMED_ORDER_LINE.is_match(line));

        let caps = UNNAMED_ORDER_LINE.captures(line).unwrap();
        assert_eq!(&caps["id"], "7");
        assert_eq!(&caps["quantity"], "2,5");
        assert_eq!(&caps["unit"], "KG");
    }

    #[test]
    fn test_order_line_requires_prices() {
        assert!(!NAMED_ORDER_LINE.is_match("7 Bread 2,5 KG"));
        assert!(!UNNAMED_ORDER_LINE.is_match("7 2,5 KG R$ 10,00"));
    }

    #[test]
    fn test_label_description() {
        let caps = LABEL_DESCRIPTION
            .captures("Ingredientes: farinha, água, sal. Válido 3 dias após a fabricação.")
            .unwrap();
        assert_eq!(&caps["heading"], "Ingredientes");
        assert_eq!(&caps["body"], "farinha, água, sal");
        assert_eq!(&caps["validity"], "Válido 3 dias após a fabricação.");
    }
}
