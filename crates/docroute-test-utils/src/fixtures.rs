//! Sample documents covering each detector branch.

/// Invoice envelope with its fields nested under `data`.
pub const INVOICE_JSON: &str = r#"{"type":"invoice","data":{"invoice_number":"INV-001","amount":1000,"date":"2024-03-20"}}"#;

/// RFQ email with bare headers and a short body.
pub const RFQ_EMAIL: &str = "From: sender@example.com\nSubject: RFQ for Office Supplies\nDate: 2024-03-20\n\nDear Supplier,\n\nPlease send pricing for the items below.\n";

/// Complaint email with a display name, RFC 2822 date and urgency markers.
pub const COMPLAINT_EMAIL: &str = "From: \"Jane Doe\" <jane@example.com>\nSubject: Complaint about order ref: ORD-7781\nDate: Wed, 20 Mar 2024 10:15:00 +0000\n\nI am dissatisfied with the delivery. Please respond ASAP.\nCall me at 555-123-4567. The refund of $1,250.00 is due 03/25/2024.\n";

/// Email missing its `Date` header.
pub const UNDATED_EMAIL: &str = "From: buyer@example.com\nSubject: Quote request\n\nWe need a quote for 20 chairs.\n";

/// Text with no format markers and no intent triggers.
pub const UNSTRUCTURED_TEXT: &str = "random unstructured text with no markers";

/// Text as it comes out of a PDF converter for an invoice.
pub const INVOICE_PDF_TEXT: &str = "ACME Corp\nInvoice Number: INV-2024-17\nDate: 2024-03-20\nTotal: $1,234.50\nPayment due within 30 days.\n";

/// Minimal PDF byte prefix recognised by signature sniffing.
pub const PDF_MAGIC: &[u8] = b"%PDF-1.7\n";
