use concordium_cis2::{TokenAmountU64, TokenIdU64};
use concordium_std::*;

use crate::external::{InitParams, TokenMetadata};
use crate::types::{ContractError, ContractResult, ContractTokenAmount, ContractTokenId};

/// The contract state.
#[derive(Serial, DeserialWithState, StateClone)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Static reference information about the contract, set at init and never
    /// touched by any entrypoint.
    pub metadata: StateMap<String, Vec<u8>, S>,
    /// Metadata for every minted token. A token exists iff it has an entry in
    /// this map.
    pub token_metadata: StateMap<ContractTokenId, TokenMetadata, S>,
    /// The single owner of every minted token. Invariant: the key set always
    /// matches the key set of `token_metadata`.
    pub token_owners: StateMap<ContractTokenId, Address, S>,
    /// The only address allowed to mint.
    pub minter: Address,
    /// The smallest token id that has not been minted yet.
    pub next_token_id: u64,
}

impl<S: HasStateApi> State<S> {
    /// Creates a state with the given contract metadata and minter and no
    /// tokens.
    pub fn new(state_builder: &mut StateBuilder<S>, params: InitParams) -> Self {
        let mut metadata = state_builder.new_map();
        for (key, value) in params.metadata {
            metadata.insert(key, value);
        }
        Self {
            metadata,
            token_metadata: state_builder.new_map(),
            token_owners: state_builder.new_map(),
            minter: params.minter,
            next_token_id: 1,
        }
    }

    /// Mint a new token with the given owner and metadata, assigning the next
    /// sequential id. Both token maps are written here and nowhere else, so
    /// their key sets cannot diverge.
    pub fn mint(&mut self, owner: Address, metadata: TokenMetadata) -> ContractTokenId {
        let token_id = TokenIdU64(self.next_token_id);
        self.token_owners.insert(token_id, owner);
        self.token_metadata.insert(token_id, metadata);
        self.next_token_id += 1;
        token_id
    }

    /// Check whether a token with this id has been minted.
    pub fn contains_token(&self, token_id: &ContractTokenId) -> bool {
        self.token_metadata.get(token_id).is_some()
    }

    /// The balance of an address for a token id, where an id that was never
    /// minted simply counts as balance 0. Since every token is unique the
    /// result is either 1 or 0.
    pub fn balance_of(&self, owner: &Address, token_id: &ContractTokenId) -> ContractTokenAmount {
        let holds = self
            .token_owners
            .get(token_id)
            .map_or(false, |stored| *stored == *owner);
        TokenAmountU64(if holds { 1 } else { 0 })
    }

    /// Like [`State::balance_of`], but results in an error if the token id
    /// was never minted.
    pub fn balance(
        &self,
        owner: &Address,
        token_id: &ContractTokenId,
    ) -> ContractResult<ContractTokenAmount> {
        ensure!(
            self.contains_token(token_id),
            ContractError::InvalidTokenId
        );
        Ok(self.balance_of(owner, token_id))
    }

    /// The metadata stored for a token id. Results in an error if the token
    /// id was never minted.
    pub fn token_metadata(&self, token_id: &ContractTokenId) -> ContractResult<TokenMetadata> {
        self.token_metadata
            .get(token_id)
            .map(|metadata| (*metadata).clone())
            .ok_or(ContractError::InvalidTokenId)
    }

    /// All minted token ids, in mint order.
    pub fn all_tokens(&self) -> Vec<ContractTokenId> {
        (1..self.next_token_id).map(TokenIdU64).collect()
    }
}
