// src/domain/models.rs

use chrono::NaiveDate;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::domain::money::Pence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Landlord,
    Tenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Failed,
}

/// Text-backed enums share the same SQLite mapping.
macro_rules! text_enum {
    ($ty:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($ty::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                match s {
                    $($text => Some($ty::$variant),)+
                    _ => None,
                }
            }
        }

        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let s = value.as_str()?;
                $ty::parse(s).ok_or(FromSqlError::InvalidType)
            }
        }
    };
}

text_enum!(Role { Landlord => "landlord", Tenant => "tenant" });
text_enum!(RequestStatus {
    Pending => "Pending",
    InProgress => "In Progress",
    Resolved => "Resolved",
});
text_enum!(PaymentStatus { Paid => "Paid", Failed => "Failed" });

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: Role,
    pub sex: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub profile_image: Option<String>,
    pub must_change_password: bool,
    pub created_at: i64,
}

impl User {
    pub fn full_name(&self) -> String {
        join_name(&self.first_name, &self.last_name)
    }
}

pub fn join_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct Property {
    pub id: i64,
    pub landlord_id: i64,
    pub name: String,
    pub location: String,
    pub price: Pence,
    pub description: String,
    pub images: Vec<String>,
    pub created_at: i64,
}

/// A tenant's rental record joined with their user profile and property name.
#[derive(Debug, Clone, Serialize)]
pub struct Tenant {
    pub user_id: i64,
    pub landlord_id: i64,
    pub property_id: Option<i64>,
    pub property_name: Option<String>,
    pub rent: Pence,
    pub rent_start_date: Option<NaiveDate>,
    pub next_rent_date: Option<NaiveDate>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Payment {
    pub id: i64,
    pub tenant_id: i64,
    pub tenant_name: String,
    pub landlord_id: i64,
    pub property_id: Option<i64>,
    pub amount: Pence,
    pub paid_at: i64,
    pub status: PaymentStatus,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceRequest {
    pub id: i64,
    pub tenant_id: i64,
    pub tenant_name: String,
    pub title: String,
    pub description: String,
    pub status: RequestStatus,
    pub images: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub recipient_id: i64,
    pub content: String,
    pub sent_at: i64,
    pub read_at: Option<i64>,
}
