use maud::{html, Markup};

use crate::templates::layouts::email::email_layout;

pub const PASSWORD_RESET_SUBJECT: &str = "Reset your RentWave password";

pub fn password_reset_email(first_name: &str, link: &str, ttl_minutes: i64) -> Markup {
    let content = html! {
        p { "Hi " (first_name) "," }
        p { "We received a request to reset your RentWave password." }
        p { a class="button" href=(link) { "Choose a new password" } }
        p { "This link expires in " (ttl_minutes) " minutes and can be used once." }
        p { "If you didn't ask for this, you can ignore this email." }
    };

    email_layout(
        "Password Reset - RentWave",
        "Password Reset",
        "RentWave - Making Rental Management Easier",
        content,
    )
}
