use crate::{
    column::{Column, ColumnData},
    fill::FillOutcome,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Row order: each null takes the nearest preceding value.
    Forward,
    /// Reverse row order: each null takes the nearest following value.
    Backward,
}

pub(crate) fn fill_directional(column: &Column, direction: Direction) -> FillOutcome {
    if !column.has_nulls() {
        return FillOutcome::unchanged(column);
    }
    let mut filled = column.clone();
    match filled.data_mut() {
        ColumnData::Number(values) => propagate(values, direction),
        ColumnData::Timestamp(values) => propagate(values, direction),
        ColumnData::Text(values) => propagate(values, direction),
        // codes already point into the dictionary
        ColumnData::Categorical { codes, .. } => propagate(codes, direction),
    }
    FillOutcome::filled(filled)
}

fn propagate<T: Clone>(values: &mut [Option<T>], direction: Direction) {
    match direction {
        Direction::Forward => carry(values.iter_mut()),
        Direction::Backward => carry(values.iter_mut().rev()),
    }
}

fn carry<'a, T, I>(slots: I)
where
    T: Clone + 'a,
    I: Iterator<Item = &'a mut Option<T>>,
{
    let mut last: Option<T> = None;
    for slot in slots {
        if slot.is_some() {
            last = slot.clone();
        } else {
            *slot = last.clone();
        }
    }
}
