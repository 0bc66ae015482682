use std::{collections::HashSet, fmt::Display};

use alloy::primitives::Address;
use serde::Serialize;

/// Burn address that the data API never answers for in time.
pub const DEAD_ADDRESS: &str = "0x000000000000000000000000000000000000dead";

/// Account identifier, always stored lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HolderAddress(String);

impl HolderAddress {
    pub fn new(address: impl AsRef<str>) -> Self {
        Self(address.as_ref().trim().to_ascii_lowercase())
    }

    pub fn dead() -> Self {
        Self::new(DEAD_ADDRESS)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for HolderAddress {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for HolderAddress {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Address> for HolderAddress {
    fn from(value: Address) -> Self {
        Self::new(value.to_string())
    }
}

impl Display for HolderAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insertion ordered set of holders, duplicates keep their first position.
#[derive(Clone, Debug, Default)]
pub struct HolderSet {
    order: Vec<HolderAddress>,
    seen: HashSet<HolderAddress>,
}

impl HolderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the address was already present.
    pub fn insert(&mut self, address: HolderAddress) -> bool {
        if self.seen.insert(address.clone()) {
            self.order.push(address);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, address: &HolderAddress) -> bool {
        self.seen.contains(address)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HolderAddress> {
        self.order.iter()
    }

    pub fn into_vec(self) -> Vec<HolderAddress> {
        self.order
    }
}

impl FromIterator<HolderAddress> for HolderSet {
    fn from_iter<T: IntoIterator<Item = HolderAddress>>(iter: T) -> Self {
        let mut set = HolderSet::new();
        for address in iter {
            set.insert(address);
        }
        set
    }
}

impl<'a> IntoIterator for &'a HolderSet {
    type Item = &'a HolderAddress;
    type IntoIter = std::slice::Iter<'a, HolderAddress>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_lowercased() {
        let address = HolderAddress::new("0x000000000000000000000000000000000000dEaD");
        assert_eq!(address, HolderAddress::dead());

        let checksummed: Address = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e"
            .parse()
            .unwrap();
        assert_eq!(
            HolderAddress::from(checksummed).as_str(),
            "0x742d35cc6634c0532925a3b844bc454e4438f44e"
        );
    }

    #[test]
    fn test_holder_set_keeps_first_appearance() {
        let set: HolderSet = ["0xbbb", "0xaaa", "0xBBB", "0xccc", "0xaaa"]
            .into_iter()
            .map(HolderAddress::from)
            .collect();

        assert_eq!(set.len(), 3);
        assert!(set.contains(&"0xbbb".into()));
        assert_eq!(
            set.into_vec(),
            vec![
                HolderAddress::from("0xbbb"),
                HolderAddress::from("0xaaa"),
                HolderAddress::from("0xccc"),
            ]
        );
    }
}
