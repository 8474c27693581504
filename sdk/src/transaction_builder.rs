//! Offline instruction builders for the access-pass protocol
//!
//! Every builder produces a ready-to-send `Instruction` without touching an
//! RPC endpoint. Account lists mirror the program's `Accounts` structs
//! exactly; optional accounts that do not apply are passed as the program id,
//! which is how Anchor encodes an omitted optional account.
//!
//! Fund accounts are derived from the configured currency: for native
//! lamports the owner's own address is used, for an SPL currency the owner's
//! associated token account for the configured mint.

use crate::{
    error::{Result, TimepassError},
    pda, program_id,
    program_types::{
        CreateRewardCurveArgs, CreateTierArgs, GrantTimeArgs, InitializeArgs, PurchaseArgs,
        RefundArgs, SetGlobalSupplyCapArgs, SetReferralCodeArgs, SetTierPausedArgs,
        UpdateProtocolRecipientArgs, UpdateTierArgs, WithdrawCreatorArgs, YieldRewardsArgs,
    },
};
use anchor_lang::AnchorSerialize;
use anchor_lang::system_program;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use spl_associated_token_account::get_associated_token_address;

fn instruction_data<T: AnchorSerialize>(discriminator: [u8; 8], args: &T) -> Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    borsh::to_writer(&mut data, args)
        .map_err(|e| TimepassError::Serialization(format!("failed to serialize args: {e}")))?;
    Ok(data)
}

/// Placeholder meta for an omitted Anchor optional account
fn none_meta(program_id: &Pubkey) -> AccountMeta {
    AccountMeta::new_readonly(*program_id, false)
}

/// The fund account for `owner` under the configured currency
fn fund_address(owner: &Pubkey, currency_mint: Option<&Pubkey>) -> Pubkey {
    currency_mint.map_or(*owner, |mint| get_associated_token_address(owner, mint))
}

fn token_program_meta(currency_mint: Option<&Pubkey>, program_id: &Pubkey) -> AccountMeta {
    if currency_mint.is_some() {
        AccountMeta::new_readonly(spl_token::id(), false)
    } else {
        none_meta(program_id)
    }
}

/// Build the `initialize` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn initialize(
    authority: &Pubkey,
    args: &InitializeArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new(pda::tier_address_with_program_id(1, &program_id), false),
        AccountMeta::new(pda::curve_address_with_program_id(0, &program_id), false),
        AccountMeta::new(pda::vault_address_with_program_id(&program_id), false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    let data = {
        // Instruction discriminator (computed from "initialize")
        instruction_data([175, 175, 109, 31, 13, 152, 155, 237], args)?
    };
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `create_tier` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn create_tier(
    authority: &Pubkey,
    args: &CreateTierArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(
            pda::tier_address_with_program_id(args.tier_id, &program_id),
            false,
        ),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "create_tier")
    let data = instruction_data([64, 146, 139, 178, 95, 123, 94, 244], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `update_tier` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn update_tier(
    authority: &Pubkey,
    args: &UpdateTierArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(
            pda::tier_address_with_program_id(args.tier_id, &program_id),
            false,
        ),
        AccountMeta::new_readonly(*authority, true),
    ];
    // Instruction discriminator (computed from "update_tier")
    let data = instruction_data([22, 250, 234, 251, 201, 246, 98, 116], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `set_tier_paused` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn set_tier_paused(
    authority: &Pubkey,
    args: &SetTierPausedArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(
            pda::tier_address_with_program_id(args.tier_id, &program_id),
            false,
        ),
        AccountMeta::new_readonly(*authority, true),
    ];
    // Instruction discriminator (computed from "set_tier_paused")
    let data = instruction_data([91, 88, 141, 103, 152, 17, 179, 239], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `create_reward_curve` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn create_reward_curve(
    authority: &Pubkey,
    args: &CreateRewardCurveArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(
            pda::curve_address_with_program_id(args.curve_id, &program_id),
            false,
        ),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "create_reward_curve")
    let data = instruction_data([148, 156, 136, 167, 215, 201, 250, 212], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `set_referral_code` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn set_referral_code(
    authority: &Pubkey,
    args: &SetReferralCodeArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(
            pda::referral_code_address_with_program_id(args.code, &program_id),
            false,
        ),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "set_referral_code")
    let data = instruction_data([53, 102, 148, 218, 64, 170, 82, 216], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `set_global_supply_cap` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn set_global_supply_cap(
    authority: &Pubkey,
    args: &SetGlobalSupplyCapArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*authority, true),
    ];
    // Instruction discriminator (computed from "set_global_supply_cap")
    let data = instruction_data([249, 198, 147, 95, 8, 178, 57, 237], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `update_protocol_recipient` instruction; signed by the current
/// recipient, not the config authority
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn update_protocol_recipient(
    current_recipient: &Pubkey,
    args: &UpdateProtocolRecipientArgs,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*current_recipient, true),
    ];
    // Instruction discriminator (computed from "update_protocol_recipient")
    let data = instruction_data([163, 148, 19, 77, 38, 179, 234, 162], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `grant_time` instruction
///
/// `effective_tier_id` is the tier whose account is passed: the resolved
/// target when `args.tier_id` is 0, otherwise `args.tier_id` itself.
/// `old_tier_id` must be supplied when the grant switches an active
/// subscription off another tier.
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn grant_time(
    authority: &Pubkey,
    account: &Pubkey,
    args: &GrantTimeArgs,
    effective_tier_id: u16,
    old_tier_id: Option<u16>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new(
            pda::subscription_address_with_program_id(account, &program_id),
            false,
        ),
        AccountMeta::new(
            pda::tier_address_with_program_id(effective_tier_id, &program_id),
            false,
        ),
        old_tier_id.map_or_else(
            || none_meta(&program_id),
            |id| AccountMeta::new(pda::tier_address_with_program_id(id, &program_id), false),
        ),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "grant_time")
    let data = instruction_data([49, 7, 121, 143, 96, 24, 97, 95], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `revoke_time` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn revoke_time(
    authority: &Pubkey,
    account: &Pubkey,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new(
            pda::subscription_address_with_program_id(account, &program_id),
            false,
        ),
        AccountMeta::new_readonly(*authority, true),
    ];
    // Instruction discriminator (computed from "revoke_time")
    let data = instruction_data([67, 135, 110, 190, 231, 48, 129, 244], &())?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `refund` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn refund(
    authority: &Pubkey,
    account: &Pubkey,
    args: &RefundArgs,
    currency_mint: Option<&Pubkey>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let vault = pda::vault_address_with_program_id(&program_id);
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new(
            pda::subscription_address_with_program_id(account, &program_id),
            false,
        ),
        AccountMeta::new(vault, false),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new_readonly(*mint, false),
        ),
        AccountMeta::new(fund_address(account, currency_mint), false),
        AccountMeta::new_readonly(*authority, true),
        token_program_meta(currency_mint, &program_id),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "refund")
    let data = instruction_data([2, 96, 183, 251, 63, 208, 46, 46], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the permissionless `deactivate_subscription` instruction
///
/// `tier_id` is the expired subscription's tier; `None` for the tierless
/// no-op path.
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn deactivate_subscription(
    account: &Pubkey,
    tier_id: Option<u16>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new(
            pda::subscription_address_with_program_id(account, &program_id),
            false,
        ),
        tier_id.map_or_else(
            || none_meta(&program_id),
            |id| AccountMeta::new(pda::tier_address_with_program_id(id, &program_id), false),
        ),
    ];
    // Instruction discriminator (computed from "deactivate_subscription")
    let data = instruction_data([58, 154, 108, 191, 178, 249, 22, 222], &())?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `transfer_subscription` instruction
///
/// `tier_id` is the source subscription's tier (`None` when inactive). The
/// holder PDAs for both parties are always passed, so the reward position
/// follows the subscription.
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn transfer_subscription(
    from: &Pubkey,
    to: &Pubkey,
    tier_id: Option<u16>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let accounts = vec![
        AccountMeta::new(*from, true),
        AccountMeta::new_readonly(*to, false),
        AccountMeta::new(
            pda::subscription_address_with_program_id(from, &program_id),
            false,
        ),
        AccountMeta::new(
            pda::subscription_address_with_program_id(to, &program_id),
            false,
        ),
        AccountMeta::new(pda::holder_address_with_program_id(from, &program_id), false),
        AccountMeta::new(pda::holder_address_with_program_id(to, &program_id), false),
        tier_id.map_or_else(
            || none_meta(&program_id),
            |id| {
                AccountMeta::new_readonly(pda::tier_address_with_program_id(id, &program_id), false)
            },
        ),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "transfer_subscription")
    let data = instruction_data([134, 191, 45, 61, 88, 169, 214, 223], &())?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the permissionless `yield_rewards` instruction
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn yield_rewards(
    payer: &Pubkey,
    args: &YieldRewardsArgs,
    currency_mint: Option<&Pubkey>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let vault = pda::vault_address_with_program_id(&program_id);
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new(vault, false),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new_readonly(*mint, false),
        ),
        AccountMeta::new(*payer, true),
        AccountMeta::new(fund_address(payer, currency_mint), false),
        token_program_meta(currency_mint, &program_id),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "yield_rewards")
    let data = instruction_data([5, 64, 144, 42, 224, 98, 195, 226], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the permissionless `claim_rewards` instruction on behalf of `account`
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn claim_rewards(
    account: &Pubkey,
    currency_mint: Option<&Pubkey>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let vault = pda::vault_address_with_program_id(&program_id);
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new(
            pda::holder_address_with_program_id(account, &program_id),
            false,
        ),
        AccountMeta::new(vault, false),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new_readonly(*mint, false),
        ),
        AccountMeta::new(fund_address(account, currency_mint), false),
        token_program_meta(currency_mint, &program_id),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "claim_rewards")
    let data = instruction_data([4, 144, 132, 71, 116, 23, 151, 80], &())?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the permissionless `slash` instruction against a lapsed holder
///
/// `tier_id` is the subscription's tier; pass `None` for a deactivated
/// subscription, which is judged against its recorded slash deadline.
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn slash(
    account: &Pubkey,
    tier_id: Option<u16>,
    currency_mint: Option<&Pubkey>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let vault = pda::vault_address_with_program_id(&program_id);
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(*account, false),
        AccountMeta::new_readonly(
            pda::subscription_address_with_program_id(account, &program_id),
            false,
        ),
        tier_id.map_or_else(
            || none_meta(&program_id),
            |id| {
                AccountMeta::new_readonly(pda::tier_address_with_program_id(id, &program_id), false)
            },
        ),
        AccountMeta::new(
            pda::holder_address_with_program_id(account, &program_id),
            false,
        ),
        AccountMeta::new(vault, false),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new_readonly(*mint, false),
        ),
        AccountMeta::new(fund_address(account, currency_mint), false),
        token_program_meta(currency_mint, &program_id),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "slash")
    let data = instruction_data([204, 141, 18, 161, 8, 177, 92, 142], &())?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Build the `withdraw_creator` instruction; the destination is always the
/// authority's own fund account
///
/// # Errors
/// Returns an error if the program ID cannot be parsed
pub fn withdraw_creator(
    authority: &Pubkey,
    args: &WithdrawCreatorArgs,
    currency_mint: Option<&Pubkey>,
    program_id_override: Option<Pubkey>,
) -> Result<Instruction> {
    let program_id = match program_id_override {
        Some(id) => id,
        None => program_id()?,
    };
    let vault = pda::vault_address_with_program_id(&program_id);
    let accounts = vec![
        AccountMeta::new_readonly(pda::config_address_with_program_id(&program_id), false),
        AccountMeta::new_readonly(pda::pool_address_with_program_id(&program_id), false),
        AccountMeta::new(vault, false),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new(get_associated_token_address(&vault, mint), false),
        ),
        currency_mint.map_or_else(
            || none_meta(&program_id),
            |mint| AccountMeta::new_readonly(*mint, false),
        ),
        AccountMeta::new(fund_address(authority, currency_mint), false),
        AccountMeta::new_readonly(*authority, true),
        token_program_meta(currency_mint, &program_id),
        AccountMeta::new_readonly(system_program::ID, false),
    ];
    // Instruction discriminator (computed from "withdraw_creator")
    let data = instruction_data([216, 134, 243, 253, 80, 5, 67, 57], args)?;
    Ok(Instruction {
        program_id,
        accounts,
        data,
    })
}

/// Builder for `purchase` instructions
///
/// The purchase account list depends on the configured currency, fee
/// recipients, referral participation, and whether the account is switching
/// tiers, so this one gets a builder instead of a flat function.
#[derive(Clone, Debug, Default)]
pub struct PurchaseBuilder {
    account: Option<Pubkey>,
    payer: Option<Pubkey>,
    amount: Option<u64>,
    tier_id: u16,
    effective_tier_id: Option<u16>,
    curve_id: Option<u8>,
    old_tier_id: Option<u16>,
    referral_code: u64,
    referrer: Option<Pubkey>,
    protocol_recipient: Option<Pubkey>,
    client_recipient: Option<Pubkey>,
    currency_mint: Option<Pubkey>,
    program_id: Option<Pubkey>,
}

impl PurchaseBuilder {
    /// Create a new purchase builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the beneficiary account (defaults to the payer)
    #[must_use]
    pub const fn account(mut self, account: Pubkey) -> Self {
        self.account = Some(account);
        self
    }

    /// Set the paying signer
    #[must_use]
    pub const fn payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Set the gross purchase amount
    #[must_use]
    pub const fn amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the requested tier id argument (0 keeps the current tier)
    #[must_use]
    pub const fn tier_id(mut self, tier_id: u16) -> Self {
        self.tier_id = tier_id;
        self
    }

    /// Set the tier whose account is passed; required when `tier_id` is 0
    /// because the resolved tier must still be supplied
    #[must_use]
    pub const fn effective_tier_id(mut self, tier_id: u16) -> Self {
        self.effective_tier_id = Some(tier_id);
        self
    }

    /// Set the effective tier's reward curve id
    #[must_use]
    pub const fn curve_id(mut self, curve_id: u8) -> Self {
        self.curve_id = Some(curve_id);
        self
    }

    /// Set the tier being left when the purchase switches an active
    /// subscription to a different tier
    #[must_use]
    pub const fn old_tier_id(mut self, tier_id: u16) -> Self {
        self.old_tier_id = Some(tier_id);
        self
    }

    /// Set the referral code argument (0 = no code)
    #[must_use]
    pub const fn referral_code(mut self, code: u64) -> Self {
        self.referral_code = code;
        self
    }

    /// Set the participating referrer
    #[must_use]
    pub const fn referrer(mut self, referrer: Pubkey) -> Self {
        self.referrer = Some(referrer);
        self
    }

    /// Set the protocol fee recipient (omit when `protocol_bps` is 0)
    #[must_use]
    pub const fn protocol_recipient(mut self, recipient: Pubkey) -> Self {
        self.protocol_recipient = Some(recipient);
        self
    }

    /// Set the client fee recipient (omit when `client_bps` is 0)
    #[must_use]
    pub const fn client_recipient(mut self, recipient: Pubkey) -> Self {
        self.client_recipient = Some(recipient);
        self
    }

    /// Set the SPL currency mint (omit for native lamports)
    #[must_use]
    pub const fn currency_mint(mut self, mint: Pubkey) -> Self {
        self.currency_mint = Some(mint);
        self
    }

    /// Set the program ID to use
    #[must_use]
    pub const fn program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = Some(program_id);
        self
    }

    /// Build the purchase instruction
    ///
    /// # Errors
    /// Returns an error if a required field is missing or the program ID
    /// cannot be parsed
    pub fn build_instruction(self) -> Result<Instruction> {
        let payer = self.payer.ok_or(TimepassError::MissingField("payer"))?;
        let account = self.account.unwrap_or(payer);
        let amount = self.amount.ok_or(TimepassError::MissingField("amount"))?;
        let effective_tier_id = self
            .effective_tier_id
            .or(if self.tier_id > 0 { Some(self.tier_id) } else { None })
            .ok_or(TimepassError::MissingField("effective_tier_id"))?;
        let curve_id = self.curve_id.ok_or(TimepassError::MissingField("curve_id"))?;
        let program_id = match self.program_id {
            Some(id) => id,
            None => program_id()?,
        };

        let mint = self.currency_mint;
        let vault = pda::vault_address_with_program_id(&program_id);
        let referral_metas = if self.referral_code > 0 {
            AccountMeta::new_readonly(
                pda::referral_code_address_with_program_id(self.referral_code, &program_id),
                false,
            )
        } else {
            none_meta(&program_id)
        };
        let (referrer_meta, referrer_funds_meta) = self.referrer.map_or_else(
            || (none_meta(&program_id), none_meta(&program_id)),
            |referrer| {
                (
                    AccountMeta::new_readonly(referrer, false),
                    AccountMeta::new(fund_address(&referrer, mint.as_ref()), false),
                )
            },
        );

        let accounts = vec![
            AccountMeta::new(pda::config_address_with_program_id(&program_id), false),
            AccountMeta::new(pda::pool_address_with_program_id(&program_id), false),
            AccountMeta::new_readonly(account, false),
            AccountMeta::new(
                pda::subscription_address_with_program_id(&account, &program_id),
                false,
            ),
            AccountMeta::new(
                pda::holder_address_with_program_id(&account, &program_id),
                false,
            ),
            AccountMeta::new(
                pda::tier_address_with_program_id(effective_tier_id, &program_id),
                false,
            ),
            self.old_tier_id.map_or_else(
                || none_meta(&program_id),
                |id| AccountMeta::new(pda::tier_address_with_program_id(id, &program_id), false),
            ),
            AccountMeta::new_readonly(
                pda::curve_address_with_program_id(curve_id, &program_id),
                false,
            ),
            AccountMeta::new(vault, false),
            mint.as_ref().map_or_else(
                || none_meta(&program_id),
                |m| AccountMeta::new(get_associated_token_address(&vault, m), false),
            ),
            mint.as_ref().map_or_else(
                || none_meta(&program_id),
                |m| AccountMeta::new_readonly(*m, false),
            ),
            AccountMeta::new(payer, true),
            AccountMeta::new(fund_address(&payer, mint.as_ref()), false),
            self.protocol_recipient.map_or_else(
                || none_meta(&program_id),
                |r| AccountMeta::new(fund_address(&r, mint.as_ref()), false),
            ),
            self.client_recipient.map_or_else(
                || none_meta(&program_id),
                |r| AccountMeta::new(fund_address(&r, mint.as_ref()), false),
            ),
            referral_metas,
            referrer_meta,
            referrer_funds_meta,
            token_program_meta(mint.as_ref(), &program_id),
            AccountMeta::new_readonly(system_program::ID, false),
        ];

        let args = PurchaseArgs {
            tier_id: self.tier_id,
            amount,
            referral_code: self.referral_code,
        };
        // Instruction discriminator (computed from "purchase")
        let data = instruction_data([21, 93, 113, 154, 193, 160, 242, 168], &args)?;
        Ok(Instruction {
            program_id,
            accounts,
            data,
        })
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use solana_sdk::signature::{Keypair, Signer};

    fn test_program_id() -> Pubkey {
        Keypair::new().pubkey()
    }

    #[test]
    fn purchase_native_account_list() {
        let program_id = test_program_id();
        let payer = Keypair::new().pubkey();
        let ix = PurchaseBuilder::new()
            .payer(payer)
            .amount(5_000)
            .tier_id(1)
            .curve_id(0)
            .program_id(program_id)
            .build_instruction()
            .unwrap();

        assert_eq!(ix.program_id, program_id);
        assert_eq!(ix.accounts.len(), 20);

        // Native currency: payer_funds is the payer itself
        assert_eq!(ix.accounts[12].pubkey, payer);
        assert!(ix.accounts[11].is_signer);

        // Omitted optionals encode as the program id
        assert_eq!(ix.accounts[9].pubkey, program_id); // vault_token
        assert_eq!(ix.accounts[10].pubkey, program_id); // currency_mint
        assert_eq!(ix.accounts[18].pubkey, program_id); // token_program

        // Discriminator plus args: tier_id (2) + amount (8) + referral_code (8)
        assert_eq!(ix.data.len(), 8 + 2 + 8 + 8);
        assert_eq!(&ix.data[..8], &[21, 93, 113, 154, 193, 160, 242, 168]);
    }

    #[test]
    fn purchase_spl_derives_atas() {
        let program_id = test_program_id();
        let payer = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let ix = PurchaseBuilder::new()
            .payer(payer)
            .amount(5_000)
            .tier_id(1)
            .curve_id(0)
            .currency_mint(mint)
            .program_id(program_id)
            .build_instruction()
            .unwrap();

        let vault = pda::vault_address_with_program_id(&program_id);
        assert_eq!(
            ix.accounts[9].pubkey,
            get_associated_token_address(&vault, &mint)
        );
        assert_eq!(ix.accounts[10].pubkey, mint);
        assert_eq!(
            ix.accounts[12].pubkey,
            get_associated_token_address(&payer, &mint)
        );
        assert_eq!(ix.accounts[18].pubkey, spl_token::id());
    }

    #[test]
    fn purchase_keep_tier_requires_effective_tier() {
        let err = PurchaseBuilder::new()
            .payer(Keypair::new().pubkey())
            .amount(1_000)
            .tier_id(0)
            .curve_id(0)
            .program_id(test_program_id())
            .build_instruction()
            .unwrap_err();
        assert!(matches!(err, TimepassError::MissingField("effective_tier_id")));

        // With the resolved tier supplied, tier_id 0 builds fine
        let ix = PurchaseBuilder::new()
            .payer(Keypair::new().pubkey())
            .amount(1_000)
            .tier_id(0)
            .effective_tier_id(2)
            .curve_id(0)
            .program_id(test_program_id())
            .build_instruction()
            .unwrap();
        assert_eq!(&ix.data[8..10], &0u16.to_le_bytes());
    }

    #[test]
    fn purchase_referral_accounts() {
        let program_id = test_program_id();
        let referrer = Keypair::new().pubkey();
        let ix = PurchaseBuilder::new()
            .payer(Keypair::new().pubkey())
            .amount(1_000)
            .tier_id(1)
            .curve_id(0)
            .referral_code(77)
            .referrer(referrer)
            .program_id(program_id)
            .build_instruction()
            .unwrap();

        assert_eq!(
            ix.accounts[15].pubkey,
            pda::referral_code_address_with_program_id(77, &program_id)
        );
        assert_eq!(ix.accounts[16].pubkey, referrer);
        assert_eq!(ix.accounts[17].pubkey, referrer);
    }

    #[test]
    fn admin_instructions_carry_discriminators() {
        let program_id = test_program_id();
        let authority = Keypair::new().pubkey();
        let args = SetGlobalSupplyCapArgs { cap: 500 };
        let ix = set_global_supply_cap(&authority, &args, Some(program_id)).unwrap();
        assert_eq!(&ix.data[..8], &[249, 198, 147, 95, 8, 178, 57, 237]);
        assert_eq!(&ix.data[8..], &500u64.to_le_bytes());
        assert_eq!(ix.accounts.len(), 2);
        assert!(ix.accounts[1].is_signer);
    }

    #[test]
    fn claim_rewards_native_pays_the_account() {
        let program_id = test_program_id();
        let account = Keypair::new().pubkey();
        let ix = claim_rewards(&account, None, Some(program_id)).unwrap();
        assert_eq!(ix.accounts.len(), 10);
        assert_eq!(ix.accounts[7].pubkey, account);
        // No signer anywhere: the claim is permissionless
        assert!(ix.accounts.iter().all(|m| !m.is_signer));
    }

    #[test]
    fn slash_targets_the_lapsed_holder() {
        let program_id = test_program_id();
        let account = Keypair::new().pubkey();
        let mint = Keypair::new().pubkey();
        let ix = slash(&account, Some(3), Some(&mint), Some(program_id)).unwrap();

        assert_eq!(
            ix.accounts[4].pubkey,
            pda::tier_address_with_program_id(3, &program_id)
        );
        // SPL currency: the payout lands in the slashed account's ATA
        assert_eq!(
            ix.accounts[9].pubkey,
            get_associated_token_address(&account, &mint)
        );
    }

    #[test]
    fn slash_of_a_deactivated_subscription_needs_no_tier() {
        let program_id = test_program_id();
        let account = Keypair::new().pubkey();
        let ix = slash(&account, None, None, Some(program_id)).unwrap();
        // The tier slot carries the omitted-optional placeholder
        assert_eq!(ix.accounts[4].pubkey, program_id);
        assert_eq!(
            ix.accounts[5].pubkey,
            pda::holder_address_with_program_id(&account, &program_id)
        );
    }

    #[test]
    fn transfer_subscription_always_moves_both_holders() {
        let program_id = test_program_id();
        let from = Keypair::new().pubkey();
        let to = Keypair::new().pubkey();

        let ix = transfer_subscription(&from, &to, Some(1), Some(program_id)).unwrap();
        assert_eq!(
            ix.accounts[4].pubkey,
            pda::holder_address_with_program_id(&from, &program_id)
        );
        assert_eq!(
            ix.accounts[5].pubkey,
            pda::holder_address_with_program_id(&to, &program_id)
        );
        assert!(ix.accounts[4].is_writable);
        assert!(ix.accounts[5].is_writable);
        assert!(ix.accounts[0].is_signer);
    }
}
