use maud::{html, Markup};

use crate::templates::layouts::email::email_layout;

pub const RECEIPT_SUBJECT: &str = "RentWave Payment Receipt";

pub fn receipt_email(tenant_name: &str, amount: &str, receipt_url: &str) -> Markup {
    let content = html! {
        p { "Dear " (tenant_name) "," }
        p { "We have received your payment of £" (amount) ". Thank you for completing the transaction." }
        p { "Your payment receipt is attached to this email for your records." }
        p { a class="button" href=(receipt_url) { "Download receipt" } }
        p { "If you have any questions, feel free to reach out to us." }
        p { "Best regards," br; "The RentWave Team" }
    };

    email_layout(
        "Payment Confirmation - RentWave",
        "Payment Confirmation",
        "RentWave - Making Rental Management Easier",
        content,
    )
}
