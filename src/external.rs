use concordium_std::{collections::BTreeMap, *};

use crate::types::{ContractTokenAmount, ContractTokenId};

/// Metadata attached to a single token at mint time: named binary attributes.
#[derive(Debug, Serialize, SchemaType, Clone, PartialEq, Eq, Default)]
pub struct TokenMetadata {
    #[concordium(size_length = 2)]
    pub entries: BTreeMap<String, Vec<u8>>,
}

/// The parameter for contract initialization.
#[derive(Debug, Serialize, SchemaType)]
pub struct InitParams {
    /// Static reference information about the contract itself.
    #[concordium(size_length = 2)]
    pub metadata: BTreeMap<String, Vec<u8>>,
    /// The only address allowed to mint tokens.
    pub minter: Address,
}

/// The parameter for the contract function `mint`.
#[derive(Debug, Serialize, SchemaType)]
pub struct MintParams {
    /// Owner of the freshly minted token.
    pub owner: Address,
    /// Metadata stored with the token.
    pub metadata: TokenMetadata,
}

/// A single balance query: does `owner` hold `token_id`?
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct BalanceOfQuery {
    /// The address to check the balance of.
    pub owner: Address,
    /// The token id to check the balance for.
    pub token_id: ContractTokenId,
}

/// The parameter for the contract function `balanceOf`. The queries are
/// answered in order and the full response is sent to the given contract
/// entrypoint rather than returned.
#[derive(Debug, Serialize, SchemaType)]
pub struct BalanceOfQueryParams {
    /// The balance queries to answer.
    #[concordium(size_length = 2)]
    pub queries: Vec<BalanceOfQuery>,
    /// The contract that receives the response.
    pub result_contract: ContractAddress,
    /// The entrypoint on `result_contract` invoked with the response.
    pub result_function: OwnedEntrypointName,
}

/// A query paired with the balance it resolved to.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct BalanceOfResponseItem {
    /// The query this item answers.
    pub request: BalanceOfQuery,
    /// 1 if the token exists and is held by the queried owner, otherwise 0.
    pub balance: ContractTokenAmount,
}

/// The response sent to the callback of the contract function `balanceOf`.
#[derive(Debug, Serialize, SchemaType, PartialEq, Eq)]
pub struct BalanceOfQueryResponse(#[concordium(size_length = 2)] pub Vec<BalanceOfResponseItem>);

impl From<Vec<BalanceOfResponseItem>> for BalanceOfQueryResponse {
    fn from(results: Vec<BalanceOfResponseItem>) -> Self {
        BalanceOfQueryResponse(results)
    }
}

/// A single transfer inside a `transfer` batch.
#[derive(Debug, Serialize, SchemaType)]
pub struct TransferTx {
    /// The receiving address.
    pub to: Address,
    /// The token to transfer.
    pub token_id: ContractTokenId,
    /// The amount to transfer.
    pub amount: ContractTokenAmount,
}

/// All transfers requested on behalf of one owner.
#[derive(Debug, Serialize, SchemaType)]
pub struct TransferBatch {
    /// The address the tokens would be taken from.
    pub from: Address,
    /// The transfers out of `from`, in order.
    #[concordium(size_length = 2)]
    pub txs: Vec<TransferTx>,
}

/// The parameter for the contract function `transfer`.
#[derive(Debug, Serialize, SchemaType)]
pub struct TransferParameter(#[concordium(size_length = 2)] pub Vec<TransferBatch>);

/// An operator relation between an owner and a would-be operator for a single
/// token.
#[derive(Debug, Serialize, SchemaType, Clone, Copy, PartialEq, Eq)]
pub struct OperatorPermission {
    /// The owner granting or revoking the permission.
    pub owner: Address,
    /// The address the permission is about.
    pub operator: Address,
    /// The token the permission is scoped to.
    pub token_id: ContractTokenId,
}

/// A single update inside the `updateOperator` parameter.
#[derive(Debug, Serialize, SchemaType)]
pub enum OperatorUpdate {
    Add(OperatorPermission),
    Remove(OperatorPermission),
}

/// The parameter for the contract function `updateOperator`.
#[derive(Debug, Serialize, SchemaType)]
pub struct UpdateOperatorParams(#[concordium(size_length = 2)] pub Vec<OperatorUpdate>);
