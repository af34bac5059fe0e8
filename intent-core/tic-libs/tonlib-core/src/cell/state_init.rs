use super::ArcCell;
use crate::cell::{Cell, CellBuilder, TonCellError};
use crate::TonHash;

/// `StateInit` with neither split depth, special flags nor libraries.
pub struct StateInitBuilder {
    code: Option<ArcCell>,
    data: Option<ArcCell>,
}

impl StateInitBuilder {
    pub fn new(code: &ArcCell, data: &ArcCell) -> StateInitBuilder {
        StateInitBuilder {
            code: Some(code.clone()),
            data: Some(data.clone()),
        }
    }

    pub fn build(&self) -> Result<Cell, TonCellError> {
        let mut builder = CellBuilder::new();
        builder
            .store_bit(false)? //Split depth
            .store_bit(false)? //Tick tock
            .store_maybe_reference(self.code.as_ref())? //Code
            .store_maybe_reference(self.data.as_ref())? //Data
            .store_bit(false)?; //Library
        builder.build()
    }
}

pub fn account_id(code: &ArcCell, data: &ArcCell) -> Result<TonHash, TonCellError> {
    Ok(StateInitBuilder::new(code, data).build()?.cell_hash())
}
