//! Contact submissions recorded alongside the catalog.

use chrono::{SecondsFormat, Utc};
use libsql::{Row, Value, params};
use pureextracts_shared::{ContactForm, ContactRecord, PureExtractsError, Result};

use crate::Storage;

impl Storage {
    /// Record a contact submission and the raw workflow reply, if any.
    pub async fn save_contact(
        &self,
        form: &ContactForm,
        response: Option<&str>,
    ) -> Result<ContactRecord> {
        self.check_writable()?;
        let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let response_value = match response {
            Some(text) => Value::Text(text.to_string()),
            None => Value::Null,
        };

        let mut rows = self
            .conn
            .query(
                "INSERT INTO contacts (name, email, phone_number, message, response, submitted_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 RETURNING id",
                params![
                    form.name.as_str(),
                    form.email.as_str(),
                    form.phone_number.as_str(),
                    form.message.as_str(),
                    response_value,
                    submitted_at.as_str()
                ],
            )
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        let id = match rows.next().await {
            Ok(Some(row)) => row
                .get::<i64>(0)
                .map_err(|e| PureExtractsError::Storage(e.to_string()))?,
            Ok(None) => {
                return Err(PureExtractsError::Storage(
                    "contact insert returned no id".into(),
                ));
            }
            Err(e) => return Err(PureExtractsError::Storage(e.to_string())),
        };

        tracing::debug!(id, email = %form.email, "contact recorded");
        Ok(ContactRecord {
            id,
            form: form.clone(),
            response: response.map(String::from),
            submitted_at,
        })
    }

    /// Most recent submissions first, at most `limit` of them.
    pub async fn list_contacts(&self, limit: u32) -> Result<Vec<ContactRecord>> {
        let mut rows = self
            .conn
            .query(
                "SELECT id, name, email, phone_number, message, response, submitted_at
                 FROM contacts ORDER BY id DESC LIMIT ?1",
                params![i64::from(limit)],
            )
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?;

        let mut contacts = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?
        {
            contacts.push(row_to_contact(&row)?);
        }
        Ok(contacts)
    }
}

fn row_to_contact(row: &Row) -> Result<ContactRecord> {
    let text = |idx: i32| {
        row.get::<String>(idx)
            .map_err(|e| PureExtractsError::Storage(e.to_string()))
    };

    Ok(ContactRecord {
        id: row
            .get::<i64>(0)
            .map_err(|e| PureExtractsError::Storage(e.to_string()))?,
        form: ContactForm {
            name: text(1)?,
            email: text(2)?,
            phone_number: text(3)?,
            message: text(4)?,
        },
        response: row.get::<String>(5).ok(),
        submitted_at: text(6)?,
    })
}
