use crate::model::AccessState;
use bucketguard_types::ExposureReason;

mod acl;
mod policy;


/// Run every check in reporting order: ACL reasons precede policy reasons.
///
/// Reasons neutralised by block public access are emitted too, tagged
/// `blocked_by = pab`; the engine splits them out.
pub fn run_all(state: &AccessState, out: &mut Vec<ExposureReason>) {
    acl::run(state, out);
    policy::run(state, out);
}
