//! Default-address rule.
//!
//! Every address is either `Default` or `NonDefault`. A customer owning at
//! least one address owns exactly one `Default` address:
//!
//! - creating an address yields `Default` only when the customer has none yet;
//! - updating an address makes it `Default` and demotes all of its siblings;
//! - deleting is only allowed from `NonDefault`.

use super::address::{Address, AddressFields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PolicyViolation {
    #[error("You can not delete your default address")]
    DefaultAddressProtected,
}

pub struct DefaultAddressPolicy;

impl DefaultAddressPolicy {
    /// Default flag for a new address given the customer's current default.
    pub fn flag_for_new(current_default: Option<&Address>) -> bool {
        current_default.is_none()
    }

    /// Applies `fields` to `target_id`, flags it default and demotes every
    /// other address of the set. Leaves the set untouched and returns `false`
    /// when `target_id` is not part of it.
    pub fn promote(addresses: &mut [Address], target_id: i64, fields: &AddressFields) -> bool {
        if !addresses.iter().any(|a| a.id == target_id) {
            return false;
        }
        for address in addresses.iter_mut() {
            if address.id == target_id {
                address.apply(fields);
                address.is_default = true;
            } else {
                address.is_default = false;
            }
        }
        true
    }

    pub fn check_delete(address: &Address) -> Result<(), PolicyViolation> {
        if address.is_default {
            Err(PolicyViolation::DefaultAddressProtected)
        } else {
            Ok(())
        }
    }

    /// True when the set is empty or holds exactly one default.
    pub fn holds(addresses: &[Address]) -> bool {
        addresses.is_empty() || addresses.iter().filter(|a| a.is_default).count() == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn address(id: i64, is_default: bool) -> Address {
        let now = Utc::now();
        Address {
            id,
            street1: format!("{id} rue du test"),
            street2: None,
            city: "Lyon".into(),
            zip: "69000".into(),
            country: "France".into(),
            is_default,
            customer_id: 7,
            created_at: now,
            updated_at: now,
        }
    }

    fn fields() -> AddressFields {
        AddressFields {
            street1: "rue de la paix".into(),
            street2: Some("rue de la joie".into()),
            city: "Paris".into(),
            zip: "75000".into(),
            country: "France".into(),
        }
    }

    #[test]
    fn first_address_becomes_default() {
        assert!(DefaultAddressPolicy::flag_for_new(None));
        let existing = address(1, true);
        assert!(!DefaultAddressPolicy::flag_for_new(Some(&existing)));
    }

    #[test]
    fn promote_moves_the_default_for_every_pair() {
        for from in 1..=3 {
            for to in 1..=3 {
                if from == to {
                    continue;
                }
                let mut set: Vec<Address> = (1..=3).map(|id| address(id, id == from)).collect();
                assert!(DefaultAddressPolicy::promote(&mut set, to, &fields()));
                assert!(DefaultAddressPolicy::holds(&set));
                let target = set.iter().find(|a| a.id == to).unwrap();
                assert!(target.is_default);
                assert_eq!(target.street1, "rue de la paix");
                assert!(!set.iter().find(|a| a.id == from).unwrap().is_default);
            }
        }
    }

    #[test]
    fn promote_only_rewrites_fields_of_the_target() {
        let mut set = vec![address(1, true), address(2, false)];
        DefaultAddressPolicy::promote(&mut set, 2, &fields());
        assert_eq!(set[0].street1, "1 rue du test");
        assert_eq!(set[1].street2.as_deref(), Some("rue de la joie"));
    }

    #[test]
    fn promote_ignores_unknown_target() {
        let mut set = vec![address(1, true), address(2, false)];
        let before = set.clone();
        assert!(!DefaultAddressPolicy::promote(&mut set, 99, &fields()));
        assert_eq!(set, before);
    }

    #[test]
    fn default_address_cannot_be_deleted() {
        assert_eq!(
            DefaultAddressPolicy::check_delete(&address(1, true)),
            Err(PolicyViolation::DefaultAddressProtected)
        );
        assert!(DefaultAddressPolicy::check_delete(&address(2, false)).is_ok());
    }

    #[test]
    fn holds_detects_zero_or_two_defaults() {
        assert!(DefaultAddressPolicy::holds(&[]));
        assert!(!DefaultAddressPolicy::holds(&[address(1, false)]));
        assert!(!DefaultAddressPolicy::holds(&[address(1, true), address(2, true)]));
    }
}
