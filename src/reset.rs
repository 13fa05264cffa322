use crate::chart::LiveChart;
use crate::controller::ControllerClient;
use crate::error::TelemetryError;

/// Reset both sides: controller counters first, then the local chart.
///
/// The local clear always happens, even when the controller is
/// unreachable, and the remote error is handed back for the operator.
/// Clearing after the remote call means any fetch that raced the DELETE
/// is either wiped here or refused by the chart's generation check.
pub async fn reset_all(
    controller: &ControllerClient,
    chart: &LiveChart,
) -> Result<(), TelemetryError> {
    let remote = controller.reset_statistics().await;
    chart.clear();

    match &remote {
        Ok(()) => tracing::info!("statistics reset on controller and chart"),
        Err(err) => tracing::warn!(error = %err, "chart cleared but controller reset failed"),
    }
    remote
}
