//! A mint-only NFT smart contract in the style of the Concordium token
//! standards.
//!
//! # Description
//! An instance of this smart contract is a ledger of unique tokens with a
//! single fixed minter. Token ids are assigned sequentially starting at 1 and
//! are never reused. Every token has exactly one owner and a mapping of named
//! binary metadata attributes, both recorded once at mint time and never
//! updated afterwards.
//!
//! Tokens minted here never move: the `transfer` and `updateOperator`
//! entrypoints exist to keep the external token interface complete, but they
//! reject unconditionally and the `isOperator` view always answers `false`.
//! Balances can be queried by anyone, either through the callback based
//! `balanceOf` entrypoint or through the read-only view functions.

#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod errors;
mod external;
mod state;
mod types;
