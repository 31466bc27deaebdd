//! Preconditions that gate order creation.

use crate::domain::cart::Cart;
use crate::domain::order::NewOrder;
use crate::domain::user::{Session, UserId, UserProfile};
use crate::error::{OrderError, Result};

/// Resolves the user behind a session.
pub fn authenticated_user(session: Option<&Session>) -> Result<UserId> {
    session
        .and_then(|s| s.user_id)
        .ok_or(OrderError::Unauthenticated)
}

/// Checks the cart and profile, then snapshots them into a validated payload.
///
/// Checks run in a fixed order: cart, address, payment method, payload.
pub fn build_order(profile: &UserProfile, cart: Option<&Cart>) -> Result<NewOrder> {
    let cart = match cart {
        Some(cart) if !cart.is_empty() => cart,
        _ => return Err(OrderError::EmptyCart),
    };
    let address = profile.address.clone().ok_or(OrderError::MissingAddress)?;
    let payment_method = profile
        .payment_method
        .clone()
        .filter(|method| !method.trim().is_empty())
        .ok_or(OrderError::MissingPaymentMethod)?;

    let payload = NewOrder::from_cart(profile.id, address, payment_method, cart);
    payload.validate()?;
    Ok(payload)
}
