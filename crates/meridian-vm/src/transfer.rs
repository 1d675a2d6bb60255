//! Value transfer between accounts

use meridian_primitives::{Address, U256};
use meridian_state::AccountStore;

/// Check if `from` holds at least `value`
pub fn can_transfer<S: AccountStore + ?Sized>(store: &S, from: &Address, value: U256) -> bool {
    store.balance(from) >= value
}

/// Move `value` from `from` to `to` without checking funds.
///
/// The credit is applied even for a zero value so that `to` is touched.
pub fn transfer<S: AccountStore + ?Sized>(store: &mut S, from: Address, to: Address, value: U256) {
    store.sub_balance(from, value);
    store.add_balance(to, value);
}
