//! Contract ABIs and call encoding for the wrap pipeline.

use alloy::primitives::{Address, Bytes, U256};
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::types::{BlockchainError, BlockchainResult, TxIntent};

sol! {
    /// Wrapped native coin (WETH-style) plus the ERC-20 approval surface.
    interface IWrappedNative {
        function deposit() external payable;
        function approve(address spender, uint256 value) external returns (bool);
        function allowance(address owner, address spender) external view returns (uint256);
    }

    /// Target wrapper that turns the source token into the points-earning token.
    interface IWrapper {
        function wrap(uint256 amount, address recipient) external;
        function unwrap(uint256 amount, address recipient) external;
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Approval ceiling used instead of re-approving every wrap: 2^160 - 1.
pub const MAX_APPROVAL: U256 = U256::from_limbs([u64::MAX, u64::MAX, u32::MAX as u64, 0]);

/// Gas limit for `approve`.
pub const APPROVE_GAS: u64 = 100_000;
/// Gas limit for `deposit`.
pub const DEPOSIT_GAS: u64 = 100_000;
/// Gas limit for `wrap`.
pub const WRAP_GAS: u64 = 2_000_000;
/// Gas limit for `unwrap`.
pub const UNWRAP_GAS: u64 = 2_000_000;

impl TxIntent {
    /// `deposit()` on the native wrapper, paying `amount` in native coin.
    pub fn deposit(native_wrapper: Address, amount: U256) -> Self {
        Self {
            label: "deposit",
            to: native_wrapper,
            data: Bytes::from(IWrappedNative::depositCall {}.abi_encode()),
            value: amount,
            gas_limit: DEPOSIT_GAS,
        }
    }

    /// `approve(spender, value)` on an ERC-20 token.
    pub fn approve(token: Address, spender: Address, value: U256) -> Self {
        Self {
            label: "approve",
            to: token,
            data: Bytes::from(IWrappedNative::approveCall { spender, value }.abi_encode()),
            value: U256::ZERO,
            gas_limit: APPROVE_GAS,
        }
    }

    /// `wrap(amount, recipient)` on the target wrapper.
    pub fn wrap(target: Address, amount: U256, recipient: Address) -> Self {
        Self {
            label: "wrap",
            to: target,
            data: Bytes::from(IWrapper::wrapCall { amount, recipient }.abi_encode()),
            value: U256::ZERO,
            gas_limit: WRAP_GAS,
        }
    }

    /// `unwrap(amount, recipient)` on the target wrapper.
    pub fn unwrap(target: Address, amount: U256, recipient: Address) -> Self {
        Self {
            label: "unwrap",
            to: target,
            data: Bytes::from(IWrapper::unwrapCall { amount, recipient }.abi_encode()),
            value: U256::ZERO,
            gas_limit: UNWRAP_GAS,
        }
    }
}

/// Call data for `allowance(owner, spender)`.
pub fn allowance_call(owner: Address, spender: Address) -> Bytes {
    Bytes::from(IWrappedNative::allowanceCall { owner, spender }.abi_encode())
}

/// Call data for `balanceOf(account)`.
pub fn balance_of_call(account: Address) -> Bytes {
    Bytes::from(IWrapper::balanceOfCall { account }.abi_encode())
}

/// Decode a single `uint256` return value.
pub fn decode_uint(output: &[u8]) -> BlockchainResult<U256> {
    IWrapper::balanceOfCall::abi_decode_returns(output)
        .map_err(|e| BlockchainError::Contract(format!("Failed to decode uint256 return: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_approval_value() {
        assert_eq!(
            MAX_APPROVAL.to_string(),
            "1461501637330902918203684832716283019655932542975"
        );
        assert_eq!(MAX_APPROVAL, (U256::from(1) << 160) - U256::from(1));
    }

    #[test]
    fn test_wrap_intent_encoding() {
        let target = Address::repeat_byte(0x11);
        let recipient = Address::repeat_byte(0x22);
        let intent = TxIntent::wrap(target, U256::from(5), recipient);

        assert_eq!(intent.to, target);
        assert_eq!(intent.gas_limit, WRAP_GAS);
        assert_eq!(&intent.data[..4], IWrapper::wrapCall::SELECTOR.as_slice());

        let decoded = IWrapper::wrapCall::abi_decode(&intent.data).unwrap();
        assert_eq!(decoded.amount, U256::from(5));
        assert_eq!(decoded.recipient, recipient);
    }

    #[test]
    fn test_deposit_intent_carries_value() {
        let intent = TxIntent::deposit(Address::repeat_byte(0x33), U256::from(42));
        assert_eq!(intent.value, U256::from(42));
        assert_eq!(intent.gas_limit, DEPOSIT_GAS);
        assert_eq!(intent.data.as_ref(), IWrappedNative::depositCall::SELECTOR.as_slice());
    }

    #[test]
    fn test_approve_intent_targets_token() {
        let token = Address::repeat_byte(0x44);
        let spender = Address::repeat_byte(0x55);
        let intent = TxIntent::approve(token, spender, MAX_APPROVAL);

        assert_eq!(intent.to, token);
        let decoded = IWrappedNative::approveCall::abi_decode(&intent.data).unwrap();
        assert_eq!(decoded.spender, spender);
        assert_eq!(decoded.value, MAX_APPROVAL);
    }

    #[test]
    fn test_decode_uint() {
        let mut word = [0u8; 32];
        word[31] = 7;
        assert_eq!(decode_uint(&word).unwrap(), U256::from(7));
        assert!(decode_uint(&[1, 2, 3]).is_err());
    }
}
