//! Currency abstraction over the funds vault
//!
//! The program accepts exactly one asset, fixed at initialization: native
//! lamports (`config.currency_mint == Pubkey::default()`) or a single SPL
//! mint. The vault PDA (`["vault"]`) is a system-owned account that holds
//! native funds directly and acts as the authority over the vault token
//! account when an SPL mint is configured.
//!
//! Captures measure the vault balance before and after the pull so that
//! fee-on-transfer or short-transfer tokens cannot credit less than the
//! requested amount. Outbound transfers are signed with the vault seeds.
//!
//! On Solana a failed CPI aborts the whole transaction, so the non-reverting
//! `try_transfer_out` used by slashing pre-validates the destination instead
//! of catching a failure: an unusable destination skips the payout and
//! reports `false`.

use anchor_lang::prelude::*;
use anchor_lang::system_program;
use anchor_spl::token::{self, Token, TransferChecked};
use anchor_spl::token::spl_token::state::{Account as SplTokenAccount, AccountState, Mint as SplMint};
use anchor_lang::solana_program::program_pack::Pack;

use crate::errors::TimepassError;

/// Seed of the funds vault PDA
pub const VAULT_SEED: &[u8] = b"vault";

/// Borrowed view of the vault-side accounts a money-moving instruction needs
pub struct VaultAccess<'a, 'info> {
    /// True when the configured currency is native lamports
    pub native: bool,
    /// The configured SPL mint account (ignored for native)
    pub mint: Option<&'a AccountInfo<'info>>,
    /// The vault PDA (fund authority, native balance holder)
    pub vault: &'a AccountInfo<'info>,
    /// The vault's token account (SPL only)
    pub vault_token: Option<&'a AccountInfo<'info>>,
    /// SPL token program (SPL only)
    pub token_program: Option<&'a Program<'info, Token>>,
    /// System program (native transfers)
    pub system_program: &'a AccountInfo<'info>,
    /// Vault PDA bump, from config
    pub vault_bump: u8,
}

fn unpack_token_account(info: &AccountInfo) -> Result<SplTokenAccount> {
    let data = info.try_borrow_data()?;
    SplTokenAccount::unpack(&data).map_err(|_| TimepassError::InvalidFundAccount.into())
}

fn unpack_mint(info: &AccountInfo) -> Result<SplMint> {
    let data = info.try_borrow_data()?;
    SplMint::unpack(&data).map_err(|_| TimepassError::WrongMint.into())
}

impl<'info> VaultAccess<'_, 'info> {
    fn spl_parts(
        &self,
    ) -> Result<(
        &AccountInfo<'info>,
        &AccountInfo<'info>,
        &Program<'info, Token>,
    )> {
        let mint = self.mint.ok_or(TimepassError::InvalidFundAccount)?;
        let vault_token = self.vault_token.ok_or(TimepassError::InvalidFundAccount)?;
        let token_program = self.token_program.ok_or(TimepassError::InvalidFundAccount)?;
        Ok((mint, vault_token, token_program))
    }

    /// Current spendable vault balance.
    ///
    /// Native vaults exclude the rent-exempt reserve: that portion is not
    /// protocol value and can never be paid out.
    pub fn balance(&self) -> Result<u64> {
        if self.native {
            let reserve = Rent::get()?.minimum_balance(0);
            Ok(self.vault.lamports().saturating_sub(reserve))
        } else {
            let (_, vault_token, _) = self.spl_parts()?;
            Ok(unpack_token_account(vault_token)?.amount)
        }
    }

    /// Pulls exactly `amount` from the payer into the vault.
    ///
    /// Fails `InvalidCapture` when the vault receives less than `amount`
    /// (fee-on-transfer guard). Returns the captured amount.
    pub fn capture(
        &self,
        payer: &AccountInfo<'info>,
        payer_funds: &AccountInfo<'info>,
        amount: u64,
    ) -> Result<u64> {
        if amount == 0 {
            return Ok(0);
        }
        if self.native {
            let cpi = CpiContext::new(
                self.system_program.clone(),
                system_program::Transfer {
                    from: payer.clone(),
                    to: self.vault.clone(),
                },
            );
            system_program::transfer(cpi, amount)?;
            return Ok(amount);
        }
        let (mint, vault_token, token_program) = self.spl_parts()?;
        let before = unpack_token_account(vault_token)?.amount;
        let decimals = unpack_mint(mint)?.decimals;
        let cpi = CpiContext::new(
            token_program.to_account_info(),
            TransferChecked {
                from: payer_funds.clone(),
                mint: mint.clone(),
                to: vault_token.clone(),
                authority: payer.clone(),
            },
        );
        token::transfer_checked(cpi, amount, decimals)?;
        let after = unpack_token_account(vault_token)?.amount;
        let received = after
            .checked_sub(before)
            .ok_or(TimepassError::ArithmeticError)?;
        require!(received >= amount, TimepassError::InvalidCapture);
        Ok(received)
    }

    /// Pushes `amount` out of the vault; any failure aborts the transaction.
    pub fn transfer_out(&self, to_funds: &AccountInfo<'info>, amount: u64) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let bump = [self.vault_bump];
        let seeds: &[&[u8]] = &[VAULT_SEED, &bump];
        let signer_seeds = [seeds];
        if self.native {
            let cpi = CpiContext::new_with_signer(
                self.system_program.clone(),
                system_program::Transfer {
                    from: self.vault.clone(),
                    to: to_funds.clone(),
                },
                &signer_seeds,
            );
            system_program::transfer(cpi, amount)?;
            return Ok(());
        }
        let (mint, vault_token, token_program) = self.spl_parts()?;
        let decimals = unpack_mint(mint)?.decimals;
        let cpi = CpiContext::new_with_signer(
            token_program.to_account_info(),
            TransferChecked {
                from: vault_token.clone(),
                mint: mint.clone(),
                to: to_funds.clone(),
                authority: self.vault.clone(),
            },
            &signer_seeds,
        );
        token::transfer_checked(cpi, amount, decimals)?;
        Ok(())
    }

    /// Pushes `amount` out of the vault, returning `false` instead of failing
    /// when the destination cannot receive it. Used only where a failed payout
    /// must not block the state transition (slashing).
    pub fn try_transfer_out(&self, to_funds: &AccountInfo<'info>, amount: u64) -> Result<bool> {
        if amount == 0 {
            return Ok(true);
        }
        if !self.destination_usable(to_funds, amount)? {
            return Ok(false);
        }
        self.transfer_out(to_funds, amount)?;
        Ok(true)
    }

    fn destination_usable(&self, to_funds: &AccountInfo, amount: u64) -> Result<bool> {
        if self.native {
            // A fresh account must end up rent-exempt or the runtime rejects
            // the whole transaction
            if to_funds.lamports() == 0 {
                let reserve = Rent::get()?.minimum_balance(0);
                return Ok(amount >= reserve && to_funds.data_is_empty());
            }
            return Ok(true);
        }
        let (mint, _, token_program) = self.spl_parts()?;
        if to_funds.owner != &token_program.key() {
            return Ok(false);
        }
        let Ok(account) = unpack_token_account(to_funds) else {
            return Ok(false);
        };
        Ok(account.mint == mint.key() && account.state != AccountState::Frozen)
    }
}
