use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub String);

impl CustomerId {
    /// Fresh surrogate identifier: a random 128-bit UUID rendered as hyphenated text.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A customer as exchanged with the remote data API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomerRecord {
    pub id: CustomerId,
    pub name: String,
    pub surname: String,
    pub username: String,
    pub email: String,
    pub shipping_address: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomerField {
    Name,
    Surname,
    Username,
    Email,
    ShippingAddress,
}

impl CustomerField {
    pub const MANDATORY: [CustomerField; 5] =
        [Self::Name, Self::Surname, Self::Username, Self::Email, Self::ShippingAddress];

    /// Field name as it appears in exchange files.
    pub fn exchange_name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Surname => "surname",
            Self::Username => "username",
            Self::Email => "email",
            Self::ShippingAddress => "shippingAddress",
        }
    }
}

impl std::fmt::Display for CustomerField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.exchange_name())
    }
}

/// Unvalidated customer fields as read from an exchange file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub id: Option<String>,
    pub name: Option<String>,
    pub surname: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub shipping_address: Option<String>,
}

impl CustomerDraft {
    pub fn value(&self, field: CustomerField) -> Option<&str> {
        let value = match field {
            CustomerField::Name => &self.name,
            CustomerField::Surname => &self.surname,
            CustomerField::Username => &self.username,
            CustomerField::Email => &self.email,
            CustomerField::ShippingAddress => &self.shipping_address,
        };
        value.as_deref()
    }

    pub fn missing_fields(&self) -> Vec<CustomerField> {
        CustomerField::MANDATORY.into_iter().filter(|field| is_blank(self.value(*field))).collect()
    }

    /// Id carried by the draft, if it is not blank.
    pub fn declared_id(&self) -> Option<CustomerId> {
        self.id.as_deref().filter(|id| !id.trim().is_empty()).map(|id| CustomerId(id.to_string()))
    }

    /// Turns the draft into a submittable record, generating an id when none was declared.
    ///
    /// Fails with the list of blank mandatory fields; no id is generated in that case.
    pub fn into_record(self) -> Result<CustomerRecord, Vec<CustomerField>> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(missing);
        }

        let id = self.declared_id().unwrap_or_else(CustomerId::generate);
        Ok(CustomerRecord {
            id,
            name: self.name.unwrap_or_default(),
            surname: self.surname.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            shipping_address: self.shipping_address.unwrap_or_default(),
        })
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(|value| value.trim().is_empty()).unwrap_or(true)
}
