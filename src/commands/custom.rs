//! Batched custom command.

use crate::client::OHand;
use crate::codec::{CustomRequest, CustomResponse};
use crate::error::Result;
use crate::protocol::{Command, MAX_PROTOCOL_DATA_SIZE};

impl OHand {
    /// Send a custom request and decode the fields it asked for.
    pub fn set_custom(&mut self, hand_id: u8, request: &CustomRequest) -> Result<CustomResponse> {
        let payload = request.encode()?;
        let response =
            self.request(hand_id, Command::SetCustom, &payload, MAX_PROTOCOL_DATA_SIZE)?;
        CustomResponse::decode(request.get_flags(), &response)
    }

    /// Send a pre-encoded custom payload and return the raw response.
    pub fn set_custom_raw(&mut self, hand_id: u8, payload: &[u8]) -> Result<Vec<u8>> {
        let response =
            self.request(hand_id, Command::SetCustom, payload, MAX_PROTOCOL_DATA_SIZE)?;
        Ok(response.to_vec())
    }
}
