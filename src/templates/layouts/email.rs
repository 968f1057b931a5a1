use maud::{html, Markup, PreEscaped, DOCTYPE};

const BRAND_BLUE: &str = "#5F92DF";

fn styles() -> String {
    format!(
        r#"
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333333; background-color: #f0f4f8; margin: 0; padding: 0; }}
        .container {{ width: 80%; margin: 20px auto; padding: 20px; border: 1px solid #d0dbe1; border-radius: 10px; background-color: #f4f4f4; }}
        .header {{ background: {BRAND_BLUE}; padding: 15px; text-align: center; color: #f4f4f4; border-radius: 10px 10px 0 0; }}
        .content {{ padding: 20px; color: #333333; }}
        .highlight {{ background: #ffffff; border-left: 4px solid {BRAND_BLUE}; padding: 10px 15px; margin: 15px 0; }}
        .button {{ display: inline-block; background-color: {BRAND_BLUE}; color: #f4f4f4; padding: 12px 24px; text-decoration: none; border-radius: 5px; font-weight: bold; }}
        .footer {{ background: {BRAND_BLUE}; padding: 15px; text-align: center; font-size: 0.9em; color: #f4f4f4; border-radius: 0 0 10px 10px; }}
        "#
    )
}

/// Branded wrapper shared by every outgoing email.
pub fn email_layout(title: &str, heading: &str, footer: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { (title) }
                style { (PreEscaped(styles())) }
            }
            body {
                div class="container" {
                    div class="header" {
                        h1 { (heading) }
                    }
                    div class="content" {
                        (content)
                    }
                    div class="footer" {
                        p { (footer) }
                    }
                }
            }
        }
    }
}
