//! Registry and escrow contract interfaces.

use alloy::sol;

sol! {
    /// Document token registry.
    interface ITradeTrustToken {
        function mint(address beneficiary, address holder, uint256 tokenId, bytes remark) external returns (address);
        function burn(uint256 tokenId, bytes remark) external;
        function ownerOf(uint256 tokenId) external view returns (address);
    }

    /// Per-token escrow mediating ownership transfers.
    interface ITitleEscrow {
        function prevBeneficiary() external view returns (address);
        function prevHolder() external view returns (address);
        function rejectTransferBeneficiary(bytes remark) external;
        function rejectTransferHolder(bytes remark) external;
        function rejectTransferOwners(bytes remark) external;
    }
}
