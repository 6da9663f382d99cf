use concordium_cis2::{Cis2Event, MintEvent, TokenAmountU64};
use concordium_std::*;

use crate::errors::CustomContractError;
use crate::external::*;
use crate::state::State;
use crate::types::{ContractError, ContractResult, ContractTokenAmount, ContractTokenId};

/// The event type logged by this contract.
type ContractEvent = Cis2Event<ContractTokenId, ContractTokenAmount>;

/// Initialize the contract with its static metadata and the fixed minter
/// address. The ledger starts with no tokens and the token id counter at 1.
#[init(contract = "SoulboundNFT", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;

    // Construct the initial contract state.
    Ok(State::new(state_builder, params))
}

/// Mint a single token with the given address as the owner, assigning the
/// smallest unused token id. Logs a `Mint` event.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The sender is not the minter the contract was initialized with.
/// - It fails to log the event.
#[receive(
    contract = "SoulboundNFT",
    name = "mint",
    parameter = "MintParams",
    enable_logger,
    mutable
)]
fn contract_mint<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let params = MintParams::deserial(&mut ctx.parameter_cursor())?;

    // Only the fixed minter may create tokens.
    ensure!(
        ctx.sender() == host.state().minter,
        ContractError::Unauthorized
    );

    let owner = params.owner;
    let token_id = host.state_mut().mint(owner, params.metadata);

    // Event for the minted token.
    logger.log(&ContractEvent::Mint(MintEvent {
        token_id,
        amount: TokenAmountU64(1),
        owner,
    }))?;

    Ok(())
}

/// Resolve a list of balance queries and hand the ordered responses to the
/// contract entrypoint supplied by the caller, with no CCD attached.
///
/// Queries for token ids that were never minted resolve to balance 0, they do
/// not reject. No authorization is required.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The message sent to the callback contract rejects.
#[receive(
    contract = "SoulboundNFT",
    name = "balanceOf",
    parameter = "BalanceOfQueryParams",
    mutable
)]
fn contract_balance_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    let params = BalanceOfQueryParams::deserial(&mut ctx.parameter_cursor())?;

    // Build the response, preserving query order.
    let mut response = Vec::with_capacity(params.queries.len());
    for request in params.queries {
        let balance = host.state().balance_of(&request.owner, &request.token_id);
        response.push(BalanceOfResponseItem { request, balance });
    }

    // Hand the result off to the caller supplied destination.
    host.invoke_contract(
        &params.result_contract,
        &BalanceOfQueryResponse::from(response),
        params.result_function.as_entrypoint_name(),
        Amount::zero(),
    )?;

    Ok(())
}

/// Always rejects with `TransferDenied`: tokens minted by this contract are
/// permanently bound to their owner. The entrypoint only exists to keep the
/// external token interface complete.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Unconditionally otherwise, with `TransferDenied`.
#[receive(
    contract = "SoulboundNFT",
    name = "transfer",
    parameter = "TransferParameter"
)]
fn contract_transfer<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    // Structural validation only, the batches are never applied.
    let TransferParameter(_batches) = TransferParameter::deserial(&mut ctx.parameter_cursor())?;

    Err(CustomContractError::TransferDenied.into())
}

/// Always rejects with `OperatorsUnsupported`: this contract has no operator
/// concept. The entrypoint only exists to keep the external token interface
/// complete.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - Unconditionally otherwise, with `OperatorsUnsupported`.
#[receive(
    contract = "SoulboundNFT",
    name = "updateOperator",
    parameter = "UpdateOperatorParams"
)]
fn contract_update_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<()> {
    // Structural validation only, the updates are never applied.
    let UpdateOperatorParams(_updates) =
        UpdateOperatorParams::deserial(&mut ctx.parameter_cursor())?;

    Err(CustomContractError::OperatorsUnsupported.into())
}

/// View the metadata stored for a token id.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token id was never minted.
#[receive(
    contract = "SoulboundNFT",
    name = "tokenMetadata",
    parameter = "ContractTokenId",
    return_value = "TokenMetadata"
)]
fn contract_token_metadata<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<TokenMetadata> {
    let token_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;

    host.state().token_metadata(&token_id)
}

/// View the balance of an address for a single token id.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token id was never minted.
#[receive(
    contract = "SoulboundNFT",
    name = "getBalance",
    parameter = "BalanceOfQuery",
    return_value = "ContractTokenAmount"
)]
fn contract_get_balance<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractTokenAmount> {
    let query = BalanceOfQuery::deserial(&mut ctx.parameter_cursor())?;

    host.state().balance(&query.owner, &query.token_id)
}

/// View the total supply of a token id. Every minted token is unique, so the
/// supply of any existing token is always 1.
///
/// It rejects if:
/// - It fails to parse the parameter.
/// - The token id was never minted.
#[receive(
    contract = "SoulboundNFT",
    name = "totalSupply",
    parameter = "ContractTokenId",
    return_value = "ContractTokenAmount"
)]
fn contract_total_supply<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<ContractTokenAmount> {
    let token_id = ContractTokenId::deserial(&mut ctx.parameter_cursor())?;

    ensure!(
        host.state().contains_token(&token_id),
        ContractError::InvalidTokenId
    );

    Ok(TokenAmountU64(1))
}

/// View every minted token id, in mint order. Empty before the first mint.
#[receive(
    contract = "SoulboundNFT",
    name = "allTokens",
    return_value = "Vec<ContractTokenId>"
)]
fn contract_all_tokens<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<ContractTokenId>> {
    Ok(host.state().all_tokens())
}

/// View whether an address is an operator for an owner and token. Operators
/// are permanently unsupported, so after structural validation of the query
/// the answer is always `false`.
#[receive(
    contract = "SoulboundNFT",
    name = "isOperator",
    parameter = "OperatorPermission",
    return_value = "bool"
)]
fn contract_is_operator<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    _host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    let _query = OperatorPermission::deserial(&mut ctx.parameter_cursor())?;

    Ok(false)
}

#[concordium_cfg_test]
mod tests {
    use concordium_std::test_infrastructure::*;

    use super::*;

    const MINTER_ACCOUNT: AccountAddress = AccountAddress([1; 32]);
    const MINTER: Address = Address::Account(MINTER_ACCOUNT);
    const ALICE: Address = Address::Account(AccountAddress([2; 32]));
    const BOB: Address = Address::Account(AccountAddress([3; 32]));
    const CALLBACK_CONTRACT: ContractAddress = ContractAddress {
        index: 99,
        subindex: 0,
    };

    fn token(id: u64) -> ContractTokenId {
        concordium_cis2::TokenIdU64(id)
    }

    fn token_metadata(name: &str) -> TokenMetadata {
        let mut entries = collections::BTreeMap::new();
        entries.insert("name".to_string(), name.as_bytes().to_vec());
        TokenMetadata { entries }
    }

    /// Initialize a fresh contract with one contract metadata entry and
    /// `MINTER` as the minting authority.
    fn new_host() -> TestHost<State<TestStateApi>> {
        let mut metadata = collections::BTreeMap::new();
        metadata.insert("symbol".to_string(), b"SBT".to_vec());
        let params = InitParams {
            metadata,
            minter: MINTER,
        };
        let bytes = to_bytes(&params);

        let mut ctx = TestInitContext::empty();
        ctx.set_parameter(&bytes);
        let mut state_builder = TestStateBuilder::new();

        let state =
            contract_init(&ctx, &mut state_builder).expect_report("Failed during init_SoulboundNFT");

        TestHost::new(state, state_builder)
    }

    fn mint(
        host: &mut TestHost<State<TestStateApi>>,
        sender: Address,
        owner: Address,
        name: &str,
    ) -> ContractResult<()> {
        let params = MintParams {
            owner,
            metadata: token_metadata(name),
        };
        let bytes = to_bytes(&params);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(sender).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        contract_mint(&ctx, host, &mut logger)
    }

    /// Test initialization: contract metadata is stored, ledger is empty and
    /// the token id counter starts at 1.
    #[concordium_test]
    fn test_init() {
        let host = new_host();

        let state = host.state();
        claim_eq!(state.minter, MINTER, "Minter should be set from parameter");
        claim_eq!(state.next_token_id, 1, "First token id should be 1");
        claim!(
            state.all_tokens().is_empty(),
            "No token should be minted at init"
        );
        let symbol = state.metadata.get(&"symbol".to_string());
        claim_eq!(
            symbol.map(|value| (*value).clone()),
            Some(b"SBT".to_vec()),
            "Wrong contract metadata value"
        );
    }

    /// Test that sequential mints assign exactly the ids 1..N with no gaps
    /// and record the given owners.
    #[concordium_test]
    fn test_mint_assigns_sequential_ids() {
        let mut host = new_host();

        claim_eq!(mint(&mut host, MINTER, ALICE, "one"), Ok(()));
        claim_eq!(mint(&mut host, MINTER, ALICE, "two"), Ok(()));
        claim_eq!(mint(&mut host, MINTER, BOB, "three"), Ok(()));

        let state = host.state();
        claim_eq!(
            state.all_tokens(),
            vec![token(1), token(2), token(3)],
            "Minted ids should be 1, 2, 3 in order"
        );
        claim_eq!(state.next_token_id, 4, "Counter should advance by 1 per mint");
        claim_eq!(state.balance_of(&ALICE, &token(1)), TokenAmountU64(1));
        claim_eq!(state.balance_of(&ALICE, &token(2)), TokenAmountU64(1));
        claim_eq!(state.balance_of(&BOB, &token(3)), TokenAmountU64(1));
        claim_eq!(
            state.balance_of(&ALICE, &token(3)),
            TokenAmountU64(0),
            "Ownership is singular"
        );
    }

    /// Test that minting logs a `Mint` event for the new token.
    #[concordium_test]
    fn test_mint_logs_event() {
        let mut host = new_host();

        let params = MintParams {
            owner: ALICE,
            metadata: token_metadata("one"),
        };
        let bytes = to_bytes(&params);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(MINTER).set_parameter(&bytes);
        let mut logger = TestLogger::init();

        let result = contract_mint(&ctx, &mut host, &mut logger);
        claim_eq!(result, Ok(()), "Mint by the minter should succeed");

        claim!(
            logger.logs.contains(&to_bytes(&ContractEvent::Mint(MintEvent {
                token_id: token(1),
                amount: TokenAmountU64(1),
                owner: ALICE,
            }))),
            "Expected an event for minting token 1"
        );
    }

    /// Test that a mint attempt by anyone but the minter rejects with
    /// `Unauthorized` and leaves the ledger unchanged.
    #[concordium_test]
    fn test_mint_unauthorized() {
        let mut host = new_host();

        let result = mint(&mut host, ALICE, ALICE, "one");
        claim_eq!(
            result,
            Err(ContractError::Unauthorized),
            "Only the minter may mint"
        );

        let state = host.state();
        claim_eq!(state.next_token_id, 1, "Counter should not advance");
        claim!(
            !state.contains_token(&token(1)),
            "No token should be recorded"
        );
        claim!(state.all_tokens().is_empty(), "Ledger should stay empty");
    }

    /// Test that `balanceOf` answers queries in order, maps never-minted ids
    /// to balance 0 and delivers the response to the callback with zero CCD
    /// attached, without requiring any authorization.
    #[concordium_test]
    fn test_balance_of_delivers_ordered_responses() {
        let mut host = new_host();
        claim_eq!(mint(&mut host, MINTER, BOB, "one"), Ok(()));

        let queries = vec![
            BalanceOfQuery {
                owner: ALICE,
                token_id: token(5),
            },
            BalanceOfQuery {
                owner: BOB,
                token_id: token(1),
            },
        ];
        let expected = vec![
            BalanceOfResponseItem {
                request: queries[0],
                balance: TokenAmountU64(0),
            },
            BalanceOfResponseItem {
                request: queries[1],
                balance: TokenAmountU64(1),
            },
        ];

        host.setup_mock_entrypoint(
            CALLBACK_CONTRACT,
            OwnedEntrypointName::new_unchecked("onBalances".to_string()),
            MockFn::new(
                move |parameter, amount, _balance, _state: &mut State<TestStateApi>| {
                    let response = BalanceOfQueryResponse::deserial(&mut Cursor::new(parameter))
                        .map_err(|_| CallContractError::Trap)?;
                    if amount != Amount::zero() || response.0 != expected {
                        return Err(CallContractError::Trap);
                    }
                    Ok((false, Some(())))
                },
            ),
        );

        let params = BalanceOfQueryParams {
            queries,
            result_contract: CALLBACK_CONTRACT,
            result_function: OwnedEntrypointName::new_unchecked("onBalances".to_string()),
        };
        let bytes = to_bytes(&params);
        let mut ctx = TestReceiveContext::empty();
        // An arbitrary sender, the entrypoint is publicly callable.
        ctx.set_sender(ALICE).set_parameter(&bytes);

        let result = contract_balance_of(&ctx, &mut host);
        claim_eq!(result, Ok(()), "Callback should receive the exact response");
    }

    /// Test that `transfer` rejects every batch, including the empty one, and
    /// never moves a token.
    #[concordium_test]
    fn test_transfer_denied() {
        let mut host = new_host();
        claim_eq!(mint(&mut host, MINTER, ALICE, "one"), Ok(()));

        let params = TransferParameter(vec![TransferBatch {
            from: ALICE,
            txs: vec![TransferTx {
                to: BOB,
                token_id: token(1),
                amount: TokenAmountU64(1),
            }],
        }]);
        let bytes = to_bytes(&params);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ALICE).set_parameter(&bytes);

        let result = contract_transfer(&ctx, &host);
        claim_eq!(
            result,
            Err(CustomContractError::TransferDenied.into()),
            "Transfers are permanently denied"
        );

        let params = TransferParameter(Vec::new());
        let bytes = to_bytes(&params);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(ALICE).set_parameter(&bytes);

        let result = contract_transfer(&ctx, &host);
        claim_eq!(
            result,
            Err(CustomContractError::TransferDenied.into()),
            "Even an empty batch list is denied"
        );

        let state = host.state();
        claim_eq!(
            state.balance_of(&ALICE, &token(1)),
            TokenAmountU64(1),
            "Token should still belong to its owner"
        );
    }

    /// Test that `updateOperator` rejects both adding and removing and that
    /// `isOperator` always answers `false`.
    #[concordium_test]
    fn test_operators_unsupported() {
        let mut host = new_host();
        claim_eq!(mint(&mut host, MINTER, ALICE, "one"), Ok(()));

        let permission = OperatorPermission {
            owner: ALICE,
            operator: BOB,
            token_id: token(1),
        };

        for update in [
            OperatorUpdate::Add(permission),
            OperatorUpdate::Remove(permission),
        ] {
            let params = UpdateOperatorParams(vec![update]);
            let bytes = to_bytes(&params);
            let mut ctx = TestReceiveContext::empty();
            ctx.set_sender(ALICE).set_parameter(&bytes);

            let result = contract_update_operator(&ctx, &host);
            claim_eq!(
                result,
                Err(CustomContractError::OperatorsUnsupported.into()),
                "Operator updates are permanently unsupported"
            );
        }

        let bytes = to_bytes(&permission);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);

        let result = contract_is_operator(&ctx, &host);
        claim_eq!(result, Ok(false), "No address is ever an operator");
    }

    /// Test the read-only views over a ledger with a single minted token.
    #[concordium_test]
    fn test_views() {
        let mut host = new_host();
        claim_eq!(mint(&mut host, MINTER, ALICE, "alpha"), Ok(()));

        // tokenMetadata returns what was stored at mint time.
        let bytes = to_bytes(&token(1));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        let result = contract_token_metadata(&ctx, &host);
        claim_eq!(result, Ok(token_metadata("alpha")));

        // getBalance is 1 for the recorded owner and 0 for anyone else.
        let query = BalanceOfQuery {
            owner: ALICE,
            token_id: token(1),
        };
        let bytes = to_bytes(&query);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(contract_get_balance(&ctx, &host), Ok(TokenAmountU64(1)));

        let query = BalanceOfQuery {
            owner: BOB,
            token_id: token(1),
        };
        let bytes = to_bytes(&query);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(contract_get_balance(&ctx, &host), Ok(TokenAmountU64(0)));

        // totalSupply of an existing token is always 1.
        let bytes = to_bytes(&token(1));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(contract_total_supply(&ctx, &host), Ok(TokenAmountU64(1)));

        // allTokens lists the single minted id.
        let ctx = TestReceiveContext::empty();
        claim_eq!(contract_all_tokens(&ctx, &host), Ok(vec![token(1)]));
    }

    /// Test that the existence-requiring views reject a never-minted id with
    /// `InvalidTokenId`.
    #[concordium_test]
    fn test_views_on_unminted_token() {
        let mut host = new_host();
        claim_eq!(mint(&mut host, MINTER, ALICE, "alpha"), Ok(()));

        let bytes = to_bytes(&token(2));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(
            contract_token_metadata(&ctx, &host),
            Err(ContractError::InvalidTokenId)
        );

        let query = BalanceOfQuery {
            owner: ALICE,
            token_id: token(2),
        };
        let bytes = to_bytes(&query);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(
            contract_get_balance(&ctx, &host),
            Err(ContractError::InvalidTokenId)
        );

        let bytes = to_bytes(&token(2));
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(
            contract_total_supply(&ctx, &host),
            Err(ContractError::InvalidTokenId)
        );
    }
}
