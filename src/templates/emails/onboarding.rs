use maud::{html, Markup};

use crate::templates::layouts::email::email_layout;

pub const ONBOARDING_SUBJECT: &str = "RentWave Tenant Login Details";

pub struct OnboardingEmail<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub temp_password: &'a str,
    pub year: i32,
}

pub fn onboarding_email(data: &OnboardingEmail<'_>) -> Markup {
    let content = html! {
        p { "Dear " (data.first_name) " " (data.last_name) "," }
        p {
            "Welcome to RentWave! You have been onboarded as a tenant and your "
            "account is ready. Sign in to the RentWave tenant portal with:"
        }
        div class="highlight" {
            p { strong { "Email: " } (data.email) }
            p { strong { "Password: " } (data.temp_password) }
        }
        p { "For your security, please change this password when you first log in." }
        p { "If you have any questions, our support team is happy to help." }
        p { "Best regards," br; "RentWave Team" }
    };

    email_layout(
        "Tenant Onboarding - RentWave",
        "Welcome to RENTWAVE!",
        &format!("© {} RentWave. All rights reserved.", data.year),
        content,
    )
}
