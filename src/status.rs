use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};
use utoipa::ToSchema;

/// The fixed order pipeline. Orders only move forward, one step at a time.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Received,
    InProgress,
    Processing,
    Delivered,
}

impl OrderStatus {
    /// Zero-based position in the pipeline.
    pub fn position(self) -> usize {
        OrderStatus::iter()
            .position(|s| s == self)
            .expect("status is a pipeline member")
    }

    /// The next pipeline step, if any.
    pub fn next(self) -> Option<OrderStatus> {
        OrderStatus::iter().nth(self.position() + 1)
    }

    pub fn is_terminal(self) -> bool {
        self.next().is_none()
    }
}

/// Secondary refinement while an order is in progress.
#[derive(
    Copy,
    Clone,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    ToSchema,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ProgressStage {
    AwaitingStock,
    Packing,
    OutForDelivery,
    Completed,
}

impl ProgressStage {
    pub fn position(self) -> usize {
        ProgressStage::iter()
            .position(|s| s == self)
            .expect("stage is a pipeline member")
    }
}

/// Screen-level views over the pipeline: each admin screen is a status filter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, ToSchema)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum PipelineView {
    Incoming,
    Progress,
    Processing,
    Completed,
}

impl PipelineView {
    /// Statuses visible on this view.
    pub fn statuses(self) -> &'static [OrderStatus] {
        match self {
            PipelineView::Incoming => &[OrderStatus::Pending, OrderStatus::Received],
            PipelineView::Progress => &[OrderStatus::InProgress],
            PipelineView::Processing => &[OrderStatus::Processing],
            PipelineView::Completed => &[OrderStatus::Delivered],
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("cannot transition order from '{from}' to '{to}'")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InvalidStage {
    #[error("progress stage only applies to in-progress orders (status is '{0}')")]
    WrongStatus(OrderStatus),
    #[error("progress stage cannot move back from '{from}' to '{to}'")]
    Backwards {
        from: ProgressStage,
        to: ProgressStage,
    },
}

/// Whether `from -> to` is a legal pipeline move. Writing the same status back
/// is accepted as a no-op.
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    from == to || from.next() == Some(to)
}

/// Applies a status transition, returning the new (status, stage) pair.
///
/// Entering `in-progress` initializes the stage to `awaiting-stock`; leaving
/// it clears the stage.
pub fn transition(
    from: OrderStatus,
    stage: Option<ProgressStage>,
    to: OrderStatus,
) -> Result<(OrderStatus, Option<ProgressStage>), InvalidTransition> {
    if !can_transition(from, to) {
        return Err(InvalidTransition { from, to });
    }
    let stage = match (from, to) {
        (OrderStatus::InProgress, OrderStatus::InProgress) => stage,
        (_, OrderStatus::InProgress) => Some(ProgressStage::AwaitingStock),
        _ => None,
    };
    Ok((to, stage))
}

/// Applies a progress-stage change. Stages exist only while the order is
/// in progress, and may repeat or move forward, never back.
pub fn set_stage(
    status: OrderStatus,
    current: Option<ProgressStage>,
    new: ProgressStage,
) -> Result<ProgressStage, InvalidStage> {
    if status != OrderStatus::InProgress {
        return Err(InvalidStage::WrongStatus(status));
    }
    if let Some(current) = current {
        if new.position() < current.position() {
            return Err(InvalidStage::Backwards { from: current, to: new });
        }
    }
    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use test_case::test_case;

    #[test]
    fn pipeline_order_is_fixed() {
        let all: Vec<OrderStatus> = OrderStatus::iter().collect();
        assert_eq!(
            all,
            vec![
                OrderStatus::Pending,
                OrderStatus::Received,
                OrderStatus::InProgress,
                OrderStatus::Processing,
                OrderStatus::Delivered,
            ]
        );
        assert!(OrderStatus::Delivered.is_terminal());
    }

    #[test_case(OrderStatus::Pending, OrderStatus::Received; "pending to received")]
    #[test_case(OrderStatus::Received, OrderStatus::InProgress; "received to in progress")]
    #[test_case(OrderStatus::InProgress, OrderStatus::Processing; "in progress to processing")]
    #[test_case(OrderStatus::Processing, OrderStatus::Delivered; "processing to delivered")]
    fn forward_steps_are_legal(from: OrderStatus, to: OrderStatus) {
        assert!(can_transition(from, to));
    }

    #[test_case(OrderStatus::Pending, OrderStatus::InProgress; "skipping a step")]
    #[test_case(OrderStatus::Processing, OrderStatus::Received; "moving backwards")]
    #[test_case(OrderStatus::Delivered, OrderStatus::Pending; "reopening a delivered order")]
    fn illegal_moves_are_rejected(from: OrderStatus, to: OrderStatus) {
        assert!(!can_transition(from, to));
        assert_eq!(
            transition(from, None, to),
            Err(InvalidTransition { from, to })
        );
    }

    #[test]
    fn same_status_write_is_a_noop() {
        let (status, stage) = transition(
            OrderStatus::InProgress,
            Some(ProgressStage::Packing),
            OrderStatus::InProgress,
        )
        .unwrap();
        assert_eq!(status, OrderStatus::InProgress);
        assert_eq!(stage, Some(ProgressStage::Packing));
    }

    #[test]
    fn entering_in_progress_initializes_stage() {
        let (status, stage) =
            transition(OrderStatus::Received, None, OrderStatus::InProgress).unwrap();
        assert_eq!(status, OrderStatus::InProgress);
        assert_eq!(stage, Some(ProgressStage::AwaitingStock));
    }

    #[test]
    fn leaving_in_progress_clears_stage() {
        let (_, stage) = transition(
            OrderStatus::InProgress,
            Some(ProgressStage::Completed),
            OrderStatus::Processing,
        )
        .unwrap();
        assert_eq!(stage, None);
    }

    #[test]
    fn stage_requires_in_progress_status() {
        assert_eq!(
            set_stage(OrderStatus::Pending, None, ProgressStage::Packing),
            Err(InvalidStage::WrongStatus(OrderStatus::Pending))
        );
    }

    #[test]
    fn stage_moves_forward_or_repeats_only() {
        assert_eq!(
            set_stage(
                OrderStatus::InProgress,
                Some(ProgressStage::AwaitingStock),
                ProgressStage::OutForDelivery,
            ),
            Ok(ProgressStage::OutForDelivery)
        );
        assert_eq!(
            set_stage(
                OrderStatus::InProgress,
                Some(ProgressStage::Packing),
                ProgressStage::Packing,
            ),
            Ok(ProgressStage::Packing)
        );
        assert_eq!(
            set_stage(
                OrderStatus::InProgress,
                Some(ProgressStage::OutForDelivery),
                ProgressStage::AwaitingStock,
            ),
            Err(InvalidStage::Backwards {
                from: ProgressStage::OutForDelivery,
                to: ProgressStage::AwaitingStock,
            })
        );
    }

    #[test]
    fn wire_strings_round_trip() {
        for status in OrderStatus::iter() {
            assert_eq!(OrderStatus::from_str(&status.to_string()), Ok(status));
        }
        assert_eq!(OrderStatus::InProgress.to_string(), "in-progress");
        assert_eq!(ProgressStage::OutForDelivery.to_string(), "out-for-delivery");
        assert_eq!(
            PipelineView::from_str("incoming"),
            Ok(PipelineView::Incoming)
        );
    }

    #[test]
    fn views_cover_the_whole_pipeline() {
        let mut covered: Vec<OrderStatus> = [
            PipelineView::Incoming,
            PipelineView::Progress,
            PipelineView::Processing,
            PipelineView::Completed,
        ]
        .iter()
        .flat_map(|v| v.statuses().iter().copied())
        .collect();
        covered.sort_by_key(|s| s.position());
        assert_eq!(covered, OrderStatus::iter().collect::<Vec<_>>());
    }
}
