//! Account summary index.
//!
//! `AccountSummaries` owns the account list returned by the management API
//! and flattens it into three id indexes (accounts, web properties, profiles).
//! Each index entry stores the position of the node and of its ancestors in
//! the owned list, so parent lookups never copy or re-own nodes.
//!
//! The index is built once from a fixed snapshot. Construct a new instance to
//! reflect new source data.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{MgmtError, MgmtResult};
use crate::model::{Account, EntityId, HierarchyNode, Profile, WebProperty};

#[derive(Debug, Clone, Copy)]
struct AccountSlot {
    account: usize,
}

#[derive(Debug, Clone, Copy)]
struct PropertySlot {
    account: usize,
    property: usize,
}

#[derive(Debug, Clone, Copy)]
struct ProfileSlot {
    account: usize,
    property: usize,
    profile: usize,
}

/// Flattened, parent-aware index over an account summary list.
#[derive(Debug, Clone)]
pub struct AccountSummaries {
    summaries: Vec<Account>,
    accounts_by_id: HashMap<EntityId, AccountSlot>,
    web_properties_by_id: HashMap<EntityId, PropertySlot>,
    profiles_by_id: HashMap<EntityId, ProfileSlot>,
}

impl AccountSummaries {
    /// Index an ordered account list.
    ///
    /// Duplicate ids within one level overwrite earlier entries.
    pub fn new(summaries: Vec<Account>) -> Self {
        let mut accounts_by_id = HashMap::with_capacity(summaries.len());
        let mut web_properties_by_id = HashMap::new();
        let mut profiles_by_id = HashMap::new();

        for (ai, account) in summaries.iter().enumerate() {
            if accounts_by_id
                .insert(account.id.clone(), AccountSlot { account: ai })
                .is_some()
            {
                tracing::warn!(id = %account.id, "duplicate account id in summaries");
            }

            for (pi, property) in account.web_properties().iter().enumerate() {
                let slot = PropertySlot {
                    account: ai,
                    property: pi,
                };
                if web_properties_by_id.insert(property.id.clone(), slot).is_some() {
                    tracing::warn!(id = %property.id, "duplicate web property id in summaries");
                }

                for (vi, profile) in property.profiles().iter().enumerate() {
                    let slot = ProfileSlot {
                        account: ai,
                        property: pi,
                        profile: vi,
                    };
                    if profiles_by_id.insert(profile.id.clone(), slot).is_some() {
                        tracing::warn!(id = %profile.id, "duplicate profile id in summaries");
                    }
                }
            }
        }

        tracing::debug!(
            accounts = accounts_by_id.len(),
            web_properties = web_properties_by_id.len(),
            profiles = profiles_by_id.len(),
            "indexed account summaries"
        );

        Self {
            summaries,
            accounts_by_id,
            web_properties_by_id,
            profiles_by_id,
        }
    }

    /// Decode and index a raw `items` array.
    pub fn from_items_json(items: Value) -> MgmtResult<Self> {
        let accounts: Vec<Account> = serde_json::from_value(items).map_err(|e| {
            MgmtError::serialization(format!("failed to decode account summaries: {e}"))
        })?;
        Ok(Self::new(accounts))
    }

    /// Decode and index a whole list response (`{"items": [...], ...}`).
    ///
    /// A bare JSON array is accepted as the items list.
    pub fn from_response_json(response: Value) -> MgmtResult<Self> {
        match response {
            Value::Array(_) => Self::from_items_json(response),
            Value::Object(mut obj) => {
                let items = obj
                    .remove("items")
                    .ok_or_else(|| MgmtError::invalid_argument("response has no items"))?;
                Self::from_items_json(items)
            }
            other => Err(MgmtError::invalid_argument(format!(
                "expected a list response object or array, got {other}"
            ))),
        }
    }

    /// The full account list, in input order.
    pub fn all(&self) -> &[Account] {
        &self.summaries
    }

    pub fn len(&self) -> usize {
        self.summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    pub fn web_property_count(&self) -> usize {
        self.web_properties_by_id.len()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles_by_id.len()
    }

    /// Resolve a single-key selector.
    ///
    /// Fails with `AmbiguousSelector` when more than one of the five key names
    /// carries a non-blank value. Otherwise profiles are checked first, then
    /// web properties, then accounts.
    pub fn get(&self, selector: &Selector) -> MgmtResult<Option<Entity<'_>>> {
        let keys = selector.supplied_keys();
        if keys.len() > 1 {
            return Err(MgmtError::AmbiguousSelector { keys });
        }

        let found = selector
            .view_key()
            .and_then(|id| self.get_profile(id))
            .map(Entity::Profile)
            .or_else(|| {
                selector
                    .property_key()
                    .and_then(|id| self.get_web_property(id))
                    .map(Entity::WebProperty)
            })
            .or_else(|| {
                selector
                    .account_id
                    .as_ref()
                    .filter(|id| !id.is_blank())
                    .and_then(|id| self.get_account(id))
                    .map(Entity::Account)
            });

        Ok(found)
    }

    pub fn get_account(&self, id: impl Into<EntityId>) -> Option<&Account> {
        let slot = self.accounts_by_id.get(&id.into())?;
        Some(self.account_at(slot.account))
    }

    pub fn get_web_property(&self, id: impl Into<EntityId>) -> Option<&WebProperty> {
        let slot = self.web_properties_by_id.get(&id.into())?;
        Some(self.property_at(slot.account, slot.property))
    }

    pub fn get_property(&self, id: impl Into<EntityId>) -> Option<&WebProperty> {
        self.get_web_property(id)
    }

    pub fn get_profile(&self, id: impl Into<EntityId>) -> Option<&Profile> {
        let slot = self.profiles_by_id.get(&id.into())?;
        Some(&self.property_at(slot.account, slot.property).profiles()[slot.profile])
    }

    pub fn get_view(&self, id: impl Into<EntityId>) -> Option<&Profile> {
        self.get_profile(id)
    }

    /// The account containing the given profile.
    pub fn get_account_by_profile_id(&self, id: impl Into<EntityId>) -> Option<&Account> {
        let slot = self.profiles_by_id.get(&id.into())?;
        Some(self.account_at(slot.account))
    }

    pub fn get_account_by_view_id(&self, id: impl Into<EntityId>) -> Option<&Account> {
        self.get_account_by_profile_id(id)
    }

    /// The web property containing the given profile.
    pub fn get_web_property_by_profile_id(&self, id: impl Into<EntityId>) -> Option<&WebProperty> {
        let slot = self.profiles_by_id.get(&id.into())?;
        Some(self.property_at(slot.account, slot.property))
    }

    pub fn get_property_by_view_id(&self, id: impl Into<EntityId>) -> Option<&WebProperty> {
        self.get_web_property_by_profile_id(id)
    }

    /// The account containing the given web property.
    pub fn get_account_by_web_property_id(&self, id: impl Into<EntityId>) -> Option<&Account> {
        let slot = self.web_properties_by_id.get(&id.into())?;
        Some(self.account_at(slot.account))
    }

    pub fn get_account_by_property_id(&self, id: impl Into<EntityId>) -> Option<&Account> {
        self.get_account_by_web_property_id(id)
    }

    fn account_at(&self, account: usize) -> &Account {
        &self.summaries[account]
    }

    fn property_at(&self, account: usize, property: usize) -> &WebProperty {
        &self.summaries[account].web_properties()[property]
    }
}

/// Lookup request for [`AccountSummaries::get`].
///
/// Exactly one key may carry a value. Blank values (empty string, zero) count
/// as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub web_property_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_id: Option<EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view_id: Option<EntityId>,
}

impl Selector {
    pub fn account(id: impl Into<EntityId>) -> Self {
        Self::default().with_account_id(id)
    }

    pub fn web_property(id: impl Into<EntityId>) -> Self {
        Self::default().with_web_property_id(id)
    }

    pub fn property(id: impl Into<EntityId>) -> Self {
        Self::default().with_property_id(id)
    }

    pub fn profile(id: impl Into<EntityId>) -> Self {
        Self::default().with_profile_id(id)
    }

    pub fn view(id: impl Into<EntityId>) -> Self {
        Self::default().with_view_id(id)
    }

    pub fn with_account_id(mut self, id: impl Into<EntityId>) -> Self {
        self.account_id = Some(id.into());
        self
    }

    pub fn with_web_property_id(mut self, id: impl Into<EntityId>) -> Self {
        self.web_property_id = Some(id.into());
        self
    }

    pub fn with_property_id(mut self, id: impl Into<EntityId>) -> Self {
        self.property_id = Some(id.into());
        self
    }

    pub fn with_profile_id(mut self, id: impl Into<EntityId>) -> Self {
        self.profile_id = Some(id.into());
        self
    }

    pub fn with_view_id(mut self, id: impl Into<EntityId>) -> Self {
        self.view_id = Some(id.into());
        self
    }

    /// Key names carrying a non-blank value, in declaration order.
    pub fn supplied_keys(&self) -> Vec<&'static str> {
        [
            ("accountId", &self.account_id),
            ("webPropertyId", &self.web_property_id),
            ("propertyId", &self.property_id),
            ("profileId", &self.profile_id),
            ("viewId", &self.view_id),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_ref().is_some_and(|id| !id.is_blank()))
        .map(|(k, _)| k)
        .collect()
    }

    fn view_key(&self) -> Option<&EntityId> {
        non_blank(&self.profile_id).or_else(|| non_blank(&self.view_id))
    }

    fn property_key(&self) -> Option<&EntityId> {
        non_blank(&self.web_property_id).or_else(|| non_blank(&self.property_id))
    }
}

fn non_blank(id: &Option<EntityId>) -> Option<&EntityId> {
    id.as_ref().filter(|id| !id.is_blank())
}

/// A node resolved by [`AccountSummaries::get`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Entity<'a> {
    Account(&'a Account),
    WebProperty(&'a WebProperty),
    Profile(&'a Profile),
}

impl<'a> Entity<'a> {
    pub fn id(&self) -> &'a EntityId {
        match self {
            Self::Account(a) => &a.id,
            Self::WebProperty(p) => &p.id,
            Self::Profile(v) => &v.id,
        }
    }

    pub fn name(&self) -> Option<&'a str> {
        match self {
            Self::Account(a) => a.name(),
            Self::WebProperty(p) => p.name(),
            Self::Profile(v) => v.name(),
        }
    }

    /// Level label: "account", "webProperty" or "profile".
    pub fn level(&self) -> &'static str {
        match self {
            Self::Account(_) => "account",
            Self::WebProperty(_) => "webProperty",
            Self::Profile(_) => "profile",
        }
    }

    pub fn as_account(&self) -> Option<&'a Account> {
        match self {
            Self::Account(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_web_property(&self) -> Option<&'a WebProperty> {
        match self {
            Self::WebProperty(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_profile(&self) -> Option<&'a Profile> {
        match self {
            Self::Profile(v) => Some(v),
            _ => None,
        }
    }

    /// Serialize the referenced node to JSON.
    pub fn to_json(&self) -> MgmtResult<Value> {
        let v = match self {
            Self::Account(a) => serde_json::to_value(a),
            Self::WebProperty(p) => serde_json::to_value(p),
            Self::Profile(v) => serde_json::to_value(v),
        }?;
        Ok(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn fixture() -> AccountSummaries {
        AccountSummaries::from_items_json(json!([
            {
                "id": 1001,
                "name": "Account A",
                "webProperties": [
                    {
                        "id": "UA-1001-1",
                        "name": "WebProperty A.A",
                        "profiles": [
                            { "id": 2001, "name": "Profile A.A.A" },
                            { "id": 2002, "name": "Profile A.A.B" }
                        ]
                    },
                    {
                        "id": "UA-1001-3",
                        "name": "WebProperty A.C",
                        "profiles": [{ "id": 2008, "name": "Profile A.C.A" }]
                    }
                ]
            },
            {
                "id": 1002,
                "name": "Account B",
                "webProperties": [
                    {
                        "id": "UA-1002-1",
                        "name": "WebProperty B.A",
                        "profiles": [{ "id": 2010, "name": "Profile B.A.A" }]
                    }
                ]
            },
            {
                "id": 1005,
                "name": "Account D",
                "webProperties": [{ "id": "UA-1005-1", "name": "WebProperty D.A (View-less)" }]
            },
            { "id": 1006, "name": "Account E (Property-less)" }
        ]))
        .unwrap()
    }

    #[test]
    fn all_returns_input_order() {
        let s = fixture();
        let ids: Vec<_> = s.all().iter().map(|a| a.id.clone()).collect();
        assert_eq!(ids, vec![1001.into(), 1002.into(), 1005.into(), 1006.into()]);
        assert_eq!(s.web_property_count(), 4);
        assert_eq!(s.profile_count(), 4);
    }

    #[test]
    fn get_by_each_key() {
        let s = fixture();
        let e = s.get(&Selector::account(1002)).unwrap().unwrap();
        assert_eq!(e.name(), Some("Account B"));
        assert_eq!(e.level(), "account");

        let e = s.get(&Selector::web_property("UA-1005-1")).unwrap().unwrap();
        assert_eq!(e.name(), Some("WebProperty D.A (View-less)"));
        let e = s.get(&Selector::property("UA-1005-1")).unwrap().unwrap();
        assert!(e.as_web_property().is_some());

        let e = s.get(&Selector::profile(2010)).unwrap().unwrap();
        assert_eq!(e.name(), Some("Profile B.A.A"));
        let e = s.get(&Selector::view(2010)).unwrap().unwrap();
        assert_eq!(e.as_profile().map(|p| &p.id), Some(&EntityId::Int(2010)));
    }

    #[test]
    fn get_rejects_multiple_keys_regardless_of_validity() {
        let s = fixture();
        assert_matches!(
            s.get(&Selector::account(1001).with_profile_id(2001)),
            Err(MgmtError::AmbiguousSelector { keys }) if keys == vec!["accountId", "profileId"]
        );
        assert_matches!(
            s.get(&Selector::account(9999).with_profile_id(2001)),
            Err(MgmtError::AmbiguousSelector { .. })
        );
        assert_matches!(
            s.get(&Selector::web_property("UA-1001-1").with_property_id("UA-1001-1")),
            Err(MgmtError::AmbiguousSelector { .. })
        );
    }

    #[test]
    fn blank_values_do_not_count_as_keys() {
        let s = fixture();
        let sel = Selector::profile(2001).with_account_id("");
        assert_eq!(sel.supplied_keys(), vec!["profileId"]);
        let e = s.get(&sel).unwrap().unwrap();
        assert_eq!(e.name(), Some("Profile A.A.A"));
    }

    #[test]
    fn get_misses_are_none() {
        let s = fixture();
        assert_eq!(s.get(&Selector::profile(42)).unwrap(), None);
        assert_eq!(s.get(&Selector::default()).unwrap(), None);
        assert!(s.get_account("1001").is_none());
    }

    #[test]
    fn parent_lookups() {
        let s = fixture();
        assert_eq!(s.get_account_by_view_id(2008).and_then(|a| a.name()), Some("Account A"));
        assert_eq!(
            s.get_property_by_view_id(2010).and_then(|p| p.name()),
            Some("WebProperty B.A")
        );
        assert_eq!(
            s.get_account_by_property_id("UA-1001-3").and_then(|a| a.name()),
            Some("Account A")
        );
        assert!(s.get_account_by_profile_id(1001).is_none());
        assert!(s.get_account_by_web_property_id(2001).is_none());
    }

    #[test]
    fn aliases_return_same_references() {
        let s = fixture();
        let a = s.get_web_property("UA-1001-1").unwrap();
        let b = s.get_property("UA-1001-1").unwrap();
        assert!(std::ptr::eq(a, b));

        let v = s.get_view(2002).unwrap();
        assert!(std::ptr::eq(v, s.get_profile(2002).unwrap()));
        assert!(std::ptr::eq(v, &s.all()[0].properties()[0].views()[1]));
    }

    #[test]
    fn duplicate_ids_last_write_wins() {
        let s = AccountSummaries::new(vec![Account::new(1, "first"), Account::new(1, "second")]);
        assert_eq!(s.len(), 2);
        assert_eq!(s.get_account(1).and_then(|a| a.name()), Some("second"));
    }

    #[test]
    fn response_json_requires_items() {
        let ok = AccountSummaries::from_response_json(json!({"items": [], "totalResults": 0})).unwrap();
        assert!(ok.is_empty());
        assert_matches!(
            AccountSummaries::from_response_json(json!({"totalResults": 0})),
            Err(MgmtError::InvalidArgument(_))
        );
        assert_matches!(
            AccountSummaries::from_items_json(json!([{ "name": "no id" }])),
            Err(MgmtError::Serialization(_))
        );
    }

    #[test]
    fn selector_deserializes_camel_case() {
        let sel: Selector = serde_json::from_value(json!({"webPropertyId": "UA-1-1"})).unwrap();
        assert_eq!(sel, Selector::web_property("UA-1-1"));
    }
}
