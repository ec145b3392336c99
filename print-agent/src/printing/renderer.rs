//! Customer receipt renderer
//!
//! Renders a [`Ticket`] into the ESC/POS byte stream for a 58mm printer.
//! The layout is fixed; only the store header comes from configuration.

use rust_decimal::Decimal;
use tutto_printer::EscPosBuilder;

use super::types::{DeliveryType, LineItem, Ticket};

/// Store identity printed at the top of every receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreHeader {
    pub name: String,
    pub subtitle: String,
    pub contact_lines: Vec<String>,
}

impl Default for StoreHeader {
    fn default() -> Self {
        Self {
            name: "TUTTO BENE".to_string(),
            subtitle: "PASTAS ARTESANALES".to_string(),
            contact_lines: vec![
                "Tel: (353) 461-3071".to_string(),
                "Bv. Alvear 470 - Villa Maria".to_string(),
                "Cordoba - Argentina".to_string(),
            ],
        }
    }
}

/// Printer-ready bytes for one ticket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedDocument(Vec<u8>);

impl ComposedDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

/// Format a money amount: `$` plus the value without trailing zeros
pub fn format_money(amount: Decimal) -> String {
    format!("${}", amount.normalize())
}

/// Receipt composer
///
/// Pure: the same ticket always yields the same bytes.
#[derive(Debug, Clone)]
pub struct ReceiptComposer {
    width: usize,
    header: StoreHeader,
}

impl ReceiptComposer {
    /// Create a composer for `width` columns
    ///
    /// Common widths:
    /// - 58mm paper: 32 characters
    /// - 80mm paper: 48 characters
    pub fn new(width: usize, header: StoreHeader) -> Self {
        Self { width, header }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn header(&self) -> &StoreHeader {
        &self.header
    }

    /// Render a ticket to ESC/POS bytes
    pub fn compose(&self, ticket: &Ticket) -> ComposedDocument {
        let mut b = EscPosBuilder::new(self.width);

        self.render_header(&mut b);
        self.render_metadata(&mut b, ticket);
        self.render_customer(&mut b, ticket);
        self.render_items(&mut b, &ticket.line_items);
        self.render_total(&mut b, ticket.total);
        self.render_footer(&mut b);

        ComposedDocument(b.build())
    }

    fn render_header(&self, b: &mut EscPosBuilder) {
        b.center();
        b.bold();
        b.double_size();
        b.line(&self.header.name);
        b.reset_size();
        b.bold_off();

        b.line(&self.header.subtitle);
        for line in &self.header.contact_lines {
            b.line(line);
        }
        b.newline();
        b.left();
    }

    fn render_metadata(&self, b: &mut EscPosBuilder, ticket: &Ticket) {
        b.bold();
        b.line("Sin validez fiscal");
        b.bold_off();
        b.line(&format!("Fecha: {}", ticket.date));
        b.sep_single();
        b.newline();
    }

    fn render_customer(&self, b: &mut EscPosBuilder, ticket: &Ticket) {
        b.bold();
        b.line("DATOS DEL CLIENTE");
        b.bold_off();
        b.sep_single();

        b.line(&format!("Cliente: {}", ticket.customer_name));
        b.line(&format!("Telefono: {}", ticket.phone));
        b.line(&format!("Estado: {}", ticket.paid.label()));
        b.line(&format!("Tipo: {}", ticket.delivery_type.label()));

        if ticket.delivery_type == DeliveryType::Delivery
            && let Some(address) = &ticket.address
        {
            b.bold();
            b.line(&format!("Direccion: {}", address));
            b.bold_off();
        }
        b.newline();
    }

    fn render_items(&self, b: &mut EscPosBuilder, items: &[LineItem]) {
        b.center();
        b.bold();
        b.line("PRODUCTO");
        b.bold_off();
        b.sep_single();
        b.left();

        for item in items {
            b.line_lr(&item_label(item), &format_money(item.subtotal));
        }
    }

    fn render_total(&self, b: &mut EscPosBuilder, total: Decimal) {
        b.center();
        b.sep_single();
        b.double_height();
        b.line(&format!("TOTAL: {}", format_money(total)));
        b.reset_size();
        b.sep_single();
        b.newline();
    }

    fn render_footer(&self, b: &mut EscPosBuilder) {
        b.line("Gracias por su compra");
        b.sep_single();
        b.blank_lines(4);
        b.cut();
    }
}

impl Default for ReceiptComposer {
    fn default() -> Self {
        Self::new(32, StoreHeader::default())
    }
}

/// `Sorrentinos Salsa fileto - Grande x2`
fn item_label(item: &LineItem) -> String {
    if item.modifiers.is_empty() {
        format!("{} x{}", item.product_name, item.quantity)
    } else {
        format!(
            "{} {} x{}",
            item.product_name,
            item.modifiers.join(" - "),
            item.quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printing::types::{PaymentStatus, order_total};
    use tutto_printer::cmd;

    fn item(name: &str, price: i64, quantity: u32, modifiers: &[&str]) -> LineItem {
        LineItem::new(
            name.to_string(),
            Decimal::from(price),
            quantity,
            modifiers.iter().map(|m| m.to_string()).collect(),
        )
        .unwrap()
    }

    fn ticket(delivery_type: DeliveryType, paid: PaymentStatus) -> Ticket {
        let line_items = vec![
            item("Sorrentinos", 500, 2, &["Salsa fileto"]),
            item("Ñoquis", 300, 1, &[]),
        ];
        Ticket {
            date: "12/03/2024 20:15".to_string(),
            customer_name: "María Peña".to_string(),
            phone: "3534000000".to_string(),
            address: match delivery_type {
                DeliveryType::Delivery => Some("San Martín 123".to_string()),
                DeliveryType::Pickup => None,
            },
            paid,
            delivery_type,
            total: order_total(&line_items).unwrap(),
            line_items,
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    fn find(haystack: &[u8], needle: &[u8]) -> usize {
        haystack
            .windows(needle.len())
            .position(|w| w == needle)
            .unwrap_or_else(|| panic!("{:?} not found", String::from_utf8_lossy(needle)))
    }

    fn sep() -> Vec<u8> {
        let mut s = vec![b'-'; 32];
        s.push(b'\n');
        s
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(Decimal::from(1300)), "$1300");
        assert_eq!(format_money(Decimal::new(1250, 2)), "$12.5");
        assert_eq!(format_money(Decimal::new(1, 1) + Decimal::new(2, 1)), "$0.3");
        assert_eq!(format_money(Decimal::ZERO), "$0");
    }

    #[test]
    fn test_total_is_sum_of_subtotals() {
        let t = ticket(DeliveryType::Pickup, PaymentStatus::Paid);
        let doc = ReceiptComposer::default().compose(&t);
        let bytes = doc.as_bytes();

        let mut total_line = cmd::SIZE_DOUBLE_HEIGHT.to_vec();
        total_line.extend_from_slice(b"TOTAL: $1300\n");
        total_line.extend_from_slice(cmd::SIZE_NORMAL);
        assert!(contains(bytes, &total_line));
    }

    #[test]
    fn test_item_lines_are_justified() {
        let t = ticket(DeliveryType::Pickup, PaymentStatus::Paid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();

        // 27 + 5 columns leave no gap: joined by a single space
        assert!(contains(&bytes, b"Sorrentinos Salsa fileto x2 $1000\n"));
        // "Noquis x1" (9) + 19 spaces + "$300" (4) = 32
        let expected = format!("Noquis x1{}$300\n", " ".repeat(19));
        assert!(contains(&bytes, expected.as_bytes()));
    }

    #[test]
    fn test_pickup_omits_address() {
        let t = ticket(DeliveryType::Pickup, PaymentStatus::NotPaid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();

        assert!(contains(&bytes, b"Tipo: LOCAL\n"));
        assert!(contains(&bytes, b"Estado: NO PAGADO\n"));
        assert!(!contains(&bytes, b"Direccion"));
    }

    #[test]
    fn test_delivery_prints_bold_address_after_type() {
        let t = ticket(DeliveryType::Delivery, PaymentStatus::Paid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();

        let mut expected = b"Tipo: DOMICILIO\n".to_vec();
        expected.extend_from_slice(cmd::BOLD_ON);
        expected.extend_from_slice(b"Direccion: San Martin 123\n");
        expected.extend_from_slice(cmd::BOLD_OFF);
        expected.push(b'\n');
        assert!(contains(&bytes, &expected));
        assert!(contains(&bytes, b"Estado: PAGADO\n"));
    }

    #[test]
    fn test_accents_are_folded() {
        let t = ticket(DeliveryType::Pickup, PaymentStatus::Paid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();

        assert!(contains(&bytes, b"Cliente: Maria Pena\n"));
        assert!(bytes.iter().all(|b| b.is_ascii()));
    }

    #[test]
    fn test_section_order() {
        let t = ticket(DeliveryType::Delivery, PaymentStatus::Paid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();

        let positions: Vec<usize> = [
            b"TUTTO BENE".as_slice(),
            b"Sin validez fiscal",
            b"Fecha: 12/03/2024 20:15",
            b"DATOS DEL CLIENTE",
            b"Cliente:",
            b"Telefono:",
            b"Estado:",
            b"Tipo:",
            b"Direccion:",
            b"PRODUCTO",
            b"Sorrentinos",
            b"Noquis",
            b"TOTAL:",
            b"Gracias por su compra",
        ]
        .iter()
        .map(|needle| find(&bytes, needle))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_exact_receipt_bytes() {
        let t = Ticket {
            date: "01/01/2024".to_string(),
            customer_name: "Ana".to_string(),
            phone: "123".to_string(),
            address: None,
            paid: PaymentStatus::Paid,
            delivery_type: DeliveryType::Pickup,
            line_items: vec![item("Ravioles", 500, 2, &[])],
            total: Decimal::from(1000),
        };
        let header = StoreHeader {
            name: "TB".to_string(),
            subtitle: "PASTAS".to_string(),
            contact_lines: vec!["Tel: 1".to_string()],
        };
        let bytes = ReceiptComposer::new(32, header).compose(&t).into_bytes();

        let mut e: Vec<u8> = Vec::new();
        e.extend_from_slice(cmd::INIT);
        e.extend_from_slice(cmd::CODE_PAGE_WPC1252);
        // Header
        e.extend_from_slice(cmd::ALIGN_CENTER);
        e.extend_from_slice(cmd::BOLD_ON);
        e.extend_from_slice(cmd::SIZE_DOUBLE);
        e.extend_from_slice(b"TB\n");
        e.extend_from_slice(cmd::SIZE_NORMAL);
        e.extend_from_slice(cmd::BOLD_OFF);
        e.extend_from_slice(b"PASTAS\nTel: 1\n\n");
        e.extend_from_slice(cmd::ALIGN_LEFT);
        // Metadata
        e.extend_from_slice(cmd::BOLD_ON);
        e.extend_from_slice(b"Sin validez fiscal\n");
        e.extend_from_slice(cmd::BOLD_OFF);
        e.extend_from_slice(b"Fecha: 01/01/2024\n");
        e.extend_from_slice(&sep());
        e.push(b'\n');
        // Customer
        e.extend_from_slice(cmd::BOLD_ON);
        e.extend_from_slice(b"DATOS DEL CLIENTE\n");
        e.extend_from_slice(cmd::BOLD_OFF);
        e.extend_from_slice(&sep());
        e.extend_from_slice(b"Cliente: Ana\nTelefono: 123\nEstado: PAGADO\nTipo: LOCAL\n\n");
        // Items
        e.extend_from_slice(cmd::ALIGN_CENTER);
        e.extend_from_slice(cmd::BOLD_ON);
        e.extend_from_slice(b"PRODUCTO\n");
        e.extend_from_slice(cmd::BOLD_OFF);
        e.extend_from_slice(&sep());
        e.extend_from_slice(cmd::ALIGN_LEFT);
        e.extend_from_slice(format!("Ravioles x2{}$1000\n", " ".repeat(16)).as_bytes());
        // Total
        e.extend_from_slice(cmd::ALIGN_CENTER);
        e.extend_from_slice(&sep());
        e.extend_from_slice(cmd::SIZE_DOUBLE_HEIGHT);
        e.extend_from_slice(b"TOTAL: $1000\n");
        e.extend_from_slice(cmd::SIZE_NORMAL);
        e.extend_from_slice(&sep());
        e.push(b'\n');
        // Footer
        e.extend_from_slice(b"Gracias por su compra\n");
        e.extend_from_slice(&sep());
        e.extend_from_slice(b"\n\n\n\n");
        e.extend_from_slice(cmd::CUT_FULL);

        assert_eq!(bytes, e);
    }

    #[test]
    fn test_ends_with_cut() {
        let t = ticket(DeliveryType::Pickup, PaymentStatus::Paid);
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();
        assert!(bytes.ends_with(cmd::CUT_FULL));
        assert!(bytes.starts_with(cmd::INIT));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let t = ticket(DeliveryType::Delivery, PaymentStatus::NotPaid);
        let composer = ReceiptComposer::default();
        assert_eq!(composer.compose(&t), composer.compose(&t));
    }

    #[test]
    fn test_empty_order_totals_zero() {
        let mut t = ticket(DeliveryType::Pickup, PaymentStatus::Paid);
        t.line_items.clear();
        t.total = order_total(&t.line_items).unwrap();
        let bytes = ReceiptComposer::default().compose(&t).into_bytes();
        assert!(contains(&bytes, b"TOTAL: $0\n"));
    }
}
