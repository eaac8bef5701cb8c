//! Contact details and company requisites stored under `settings`.

use std::collections::BTreeMap;
use std::sync::Arc;

use reqwest::Method;
use serde_json::Value;
use tracing::info;
use vitrina_api_types::{Resource, SAVED_KEY, SettingEntry, SettingsSaveRequest};

use crate::application::admin::panel::{expect_key, rejection};
use crate::application::error::PanelError;
use crate::application::transport::Gateway;
use crate::application::ui::{AdminUi, Toast};
use crate::domain::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactField {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactGroup {
    pub title: &'static str,
    pub fields: &'static [ContactField],
}

const fn field(key: &'static str, label: &'static str) -> ContactField {
    ContactField { key, label }
}

/// The editable settings, in form order.
pub const CONTACT_GROUPS: &[ContactGroup] = &[
    ContactGroup {
        title: "Телефоны",
        fields: &[
            field("phone_main", "Основной телефон"),
            field("phone_main_note", "Примечание к основному"),
            field("phone_2", "Телефон 2"),
            field("phone_3", "Телефон 3"),
        ],
    },
    ContactGroup {
        title: "Email",
        fields: &[
            field("email_main", "Основной email"),
            field("email_2", "Email 2"),
            field("email_3", "Email 3"),
        ],
    },
    ContactGroup {
        title: "Адрес и часы работы",
        fields: &[
            field("address", "Адрес"),
            field("address_note", "Примечание к адресу"),
            field("hours_weekdays", "Часы работы (будни)"),
            field("hours_saturday", "Суббота"),
            field("hours_sunday", "Воскресенье"),
        ],
    },
    ContactGroup {
        title: "Социальные сети",
        fields: &[
            field("vk_url", "ВКонтакте (ссылка)"),
            field("telegram_url", "Telegram (ссылка)"),
        ],
    },
    ContactGroup {
        title: "Реквизиты компании",
        fields: &[
            field("company_name", "Полное наименование"),
            field("legal_address", "Юридический адрес"),
            field("inn", "ИНН"),
            field("kpp", "КПП"),
            field("ogrn", "ОГРН"),
            field("bank_name", "Банк"),
            field("bank_account", "Расчётный счёт"),
            field("bank_corr", "Корр. счёт"),
            field("bank_bik", "БИК"),
        ],
    },
];

pub fn contact_field(key: &str) -> Option<&'static ContactField> {
    CONTACT_GROUPS
        .iter()
        .flat_map(|group| group.fields.iter())
        .find(|field| field.key == key)
}

/// Flatten a `{settings: {key: {value, label}}}` body into `key -> value`.
pub fn decode_settings(response: &Value) -> Result<BTreeMap<String, String>, PanelError> {
    let settings = response
        .get(Resource::Settings.as_str())
        .ok_or_else(|| match rejection(response) {
            Some(message) => PanelError::Rejected(message),
            None => PanelError::Malformed("response lacks `settings`".into()),
        })?;
    let entries: BTreeMap<String, SettingEntry> = serde_json::from_value(settings.clone())
        .map_err(|err| PanelError::Malformed(err.to_string()))?;
    Ok(entries
        .into_iter()
        .map(|(key, entry)| (key, entry.value))
        .collect())
}

pub struct ContactsPanel {
    gateway: Gateway,
    ui: Arc<dyn AdminUi>,
    values: BTreeMap<String, String>,
}

impl ContactsPanel {
    pub fn new(gateway: Gateway, ui: Arc<dyn AdminUi>) -> Self {
        Self {
            gateway,
            ui,
            values: BTreeMap::new(),
        }
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), PanelError> {
        if contact_field(key).is_none() {
            let err = PanelError::from(ValidationError::new(
                "key",
                format!("unknown contact setting `{key}`"),
            ));
            return Err(self.report(err));
        }
        self.values.insert(key.to_string(), value.into());
        Ok(())
    }

    pub async fn load(&mut self) -> Result<(), PanelError> {
        let response = match self
            .gateway
            .call(Method::GET, Resource::Settings, None, None)
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };
        match decode_settings(&response) {
            Ok(values) => {
                self.values = values;
                Ok(())
            }
            Err(err) => Err(self.report(err)),
        }
    }

    pub async fn save(&mut self) -> Result<(), PanelError> {
        let request = SettingsSaveRequest {
            settings: self.values.clone(),
        };
        let body = serde_json::to_value(&request)
            .map_err(|err| self.report(PanelError::Malformed(err.to_string())))?;
        let response = match self
            .gateway
            .call(Method::POST, Resource::Settings, Some(body), None)
            .await
        {
            Ok(response) => response,
            Err(err) => return Err(self.report(err.into())),
        };
        if let Err(err) = expect_key(&response, SAVED_KEY) {
            return Err(self.report(err));
        }
        info!(count = self.values.len(), "contact settings saved");
        self.ui.toast(Toast::success("Contact details saved"));
        Ok(())
    }

    fn report(&self, err: PanelError) -> PanelError {
        if let Some(message) = err.toast_message() {
            self.ui.toast(Toast::error(message));
        }
        err
    }
}
