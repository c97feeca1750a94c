use super::ScreenRegion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Selected(ScreenRegion),
    Cancelled,
}

impl SelectionOutcome {
    pub fn region(&self) -> Option<ScreenRegion> {
        match self {
            SelectionOutcome::Selected(region) => Some(*region),
            SelectionOutcome::Cancelled => None,
        }
    }
}

/// Drag state shared by every overlay of one selection session. Points are
/// global logical coordinates, so a drag may start on one display and end
/// on another.
#[derive(Debug, Default)]
pub struct RegionSelection {
    drag_start: Option<(i32, i32)>,
    drag_current: Option<(i32, i32)>,
    outcome: Option<SelectionOutcome>,
}

impl RegionSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, point: (i32, i32)) {
        if self.outcome.is_some() {
            return;
        }
        self.drag_start = Some(point);
        self.drag_current = Some(point);
    }

    pub fn move_to(&mut self, point: (i32, i32)) {
        if self.outcome.is_some() || self.drag_start.is_none() {
            return;
        }
        self.drag_current = Some(point);
    }

    /// Finishes the drag. Returns the outcome the first time the selection
    /// resolves and `None` for releases without a preceding press.
    pub fn release(&mut self, point: (i32, i32)) -> Option<SelectionOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        let start = self.drag_start.take()?;
        self.drag_current = None;

        let outcome = match ScreenRegion::from_corners(start, point) {
            Some(region) => SelectionOutcome::Selected(region),
            None => SelectionOutcome::Cancelled,
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }

    pub fn cancel(&mut self) -> Option<SelectionOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        self.drag_start = None;
        self.drag_current = None;
        self.outcome = Some(SelectionOutcome::Cancelled);
        self.outcome
    }

    pub fn outcome(&self) -> Option<SelectionOutcome> {
        self.outcome
    }

    /// Rectangle currently being dragged, without the minimum size check.
    pub fn preview(&self) -> Option<ScreenRegion> {
        let (start, current) = (self.drag_start?, self.drag_current?);
        Some(ScreenRegion::new(
            start.0.min(current.0),
            start.1.min(current.1),
            start.0.abs_diff(current.0),
            start.1.abs_diff(current.1),
        ))
    }
}
