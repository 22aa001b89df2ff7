//! Protocol selection.
//!
//! Pairs each supported protocol with its operation set and object decoder.

use crate::capability::PositionOperations;
use crate::cetus::{CetusDecoder, CetusOperations};
use crate::decoder::ObjectDecoder;
use crate::flowx::{FlowXDecoder, FlowXOperations};
use clmm_rebalancer_domain::enums::Protocol;

/// The supported protocols, each carrying its operation set and object decoder.
#[derive(Debug, Clone)]
pub enum ProtocolAdapter {
    /// Cetus CLMM.
    Cetus {
        operations: CetusOperations,
        decoder: CetusDecoder,
    },
    /// FlowX CLMM V3.
    FlowXV3 {
        operations: FlowXOperations,
        decoder: FlowXDecoder,
    },
}

impl ProtocolAdapter {
    /// Adapter with the published mainnet objects of `protocol`.
    pub fn for_protocol(protocol: Protocol) -> Self {
        match protocol {
            Protocol::Cetus => ProtocolAdapter::Cetus {
                operations: CetusOperations::default(),
                decoder: CetusDecoder::default(),
            },
            Protocol::FlowXV3 => ProtocolAdapter::FlowXV3 {
                operations: FlowXOperations::default(),
                decoder: FlowXDecoder::default(),
            },
        }
    }

    /// Protocol the adapter targets.
    pub fn protocol(&self) -> Protocol {
        match self {
            ProtocolAdapter::Cetus { .. } => Protocol::Cetus,
            ProtocolAdapter::FlowXV3 { .. } => Protocol::FlowXV3,
        }
    }

    /// Operation set of the protocol.
    pub fn operations(&self) -> &dyn PositionOperations {
        match self {
            ProtocolAdapter::Cetus { operations, .. } => operations,
            ProtocolAdapter::FlowXV3 { operations, .. } => operations,
        }
    }

    /// Object decoder of the protocol.
    pub fn decoder(&self) -> &dyn ObjectDecoder {
        match self {
            ProtocolAdapter::Cetus { decoder, .. } => decoder,
            ProtocolAdapter::FlowXV3 { decoder, .. } => decoder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adapter_matches_protocol() {
        for protocol in [Protocol::Cetus, Protocol::FlowXV3] {
            let adapter = ProtocolAdapter::for_protocol(protocol);
            assert_eq!(adapter.protocol(), protocol);
            assert_eq!(adapter.operations().protocol(), protocol);
            assert_eq!(
                adapter.operations().position_object_type(),
                adapter.decoder().position_type()
            );
        }
    }
}
