//! Account details

use serde::{Deserialize, Serialize};

/// Path of the account details endpoint
pub(crate) const ACCOUNT_INFO_PATH: &str = "/account-info/v3/details";

/// Cache key the account details are stored under
pub(crate) const ACCOUNT_INFO_KEY: &str = "account_info";

/// Details of the connected HubSpot account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    /// Portal (hub) id
    pub portal_id: i64,
    #[serde(default)]
    pub account_type: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
    #[serde(default)]
    pub company_currency: Option<String>,
    #[serde(default)]
    pub additional_currencies: Vec<String>,
    #[serde(default)]
    pub utc_offset: Option<String>,
    #[serde(default)]
    pub ui_domain: Option<String>,
    #[serde(default)]
    pub data_hosting_location: Option<String>,
}
