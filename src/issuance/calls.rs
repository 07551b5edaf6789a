//! Resolution of a request into the contract call it performs.

use alloy::primitives::Address;

use crate::error::{MutationError, MutationResult};
use crate::issuance::capabilities::{ContractCall, RegistryCall, RegistryReader};
use crate::issuance::types::{MutationKind, MutationRequest};
use crate::remark::RemarkPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Party {
    Beneficiary,
    Holder,
}

impl Party {
    fn role(self) -> &'static str {
        match self {
            Party::Beneficiary => "beneficiary",
            Party::Holder => "holder",
        }
    }
}

/// Build the call for `request`, locating the escrow for escrow-side kinds.
pub async fn resolve_call<R>(
    reader: &R,
    request: &MutationRequest,
    remark: RemarkPayload,
) -> MutationResult<RegistryCall>
where
    R: RegistryReader + ?Sized,
{
    let remark = remark.into_bytes();

    let call = match &request.kind {
        MutationKind::Issue {
            beneficiary,
            holder,
        } => RegistryCall::new(
            request.registry,
            ContractCall::Mint {
                beneficiary: *beneficiary,
                holder: *holder,
                token_id: request.token_id,
                remark,
            },
        ),
        MutationKind::AcceptReturned => RegistryCall::new(
            request.registry,
            ContractCall::Burn {
                token_id: request.token_id,
                remark,
            },
        ),
        MutationKind::RejectTransferOwner => {
            let escrow = locate_escrow(reader, request).await?;
            require_previous(reader, escrow, Party::Beneficiary).await?;
            RegistryCall::new(escrow, ContractCall::RejectTransferBeneficiary { remark })
        }
        MutationKind::RejectTransferHolder => {
            let escrow = locate_escrow(reader, request).await?;
            require_previous(reader, escrow, Party::Holder).await?;
            RegistryCall::new(escrow, ContractCall::RejectTransferHolder { remark })
        }
        MutationKind::RejectTransferOwnerHolder => {
            let escrow = locate_escrow(reader, request).await?;
            require_previous(reader, escrow, Party::Beneficiary).await?;
            require_previous(reader, escrow, Party::Holder).await?;
            RegistryCall::new(escrow, ContractCall::RejectTransferOwners { remark })
        }
    };

    Ok(call)
}

async fn locate_escrow<R>(reader: &R, request: &MutationRequest) -> MutationResult<Address>
where
    R: RegistryReader + ?Sized,
{
    let escrow = reader
        .owner_of(request.registry, request.token_id)
        .await
        .map_err(|source| MutationError::LookupFailed {
            what: "token owner",
            source,
        })?;

    tracing::debug!(registry = %request.registry, token_id = %request.token_id, escrow = %escrow, "Escrow located");
    Ok(escrow)
}

async fn require_previous<R>(reader: &R, escrow: Address, party: Party) -> MutationResult<()>
where
    R: RegistryReader + ?Sized,
{
    let previous = match party {
        Party::Beneficiary => reader.prev_beneficiary(escrow).await,
        Party::Holder => reader.prev_holder(escrow).await,
    }
    .map_err(|source| MutationError::LookupFailed {
        what: match party {
            Party::Beneficiary => "previous beneficiary",
            Party::Holder => "previous holder",
        },
        source,
    })?;

    if previous == Address::ZERO {
        return Err(MutationError::NoPreviousParty {
            escrow,
            role: party.role(),
        });
    }

    Ok(())
}
