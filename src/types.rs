use concordium_cis2::{Cis2Error, TokenAmountU64, TokenIdU64};

use crate::errors::CustomContractError;

pub type ContractResult<A> = Result<A, ContractError>;

/// Contract token ID type.
/// Token ids are assigned sequentially starting at 1, so a fixed width id
/// type is always large enough.
pub type ContractTokenId = TokenIdU64;

/// Every token is unique, so a balance is only ever 0 or 1.
pub type ContractTokenAmount = TokenAmountU64;

/// Wrapping the custom errors in a type with CIS2 errors.
pub type ContractError = Cis2Error<CustomContractError>;
