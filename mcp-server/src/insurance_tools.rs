//! Eligibility tools exposed to the voice agent
//!
//! The agent's LLM decides when to call each tool; the tools only collect
//! identity, run one pipeline stage and return the sentence to speak.
//! Expected call order:
//!
//! 1. `collect_patient_name`
//! 2. `collect_member_id`
//! 3. `run_stedi_query`
//! 4. `validate_stedi_response`
//! 5. `check_insurance_active`
//! 6. `find_stc98_copay`

use async_trait::async_trait;
use error_common::{codes, messages, report, UserFacing};
use insurance_service::constants::MIN_MEMBER_ID_LEN;
use insurance_service::{
    normalize_member_id, spell_out, CoverageStatus, InsuranceError, NetworkStatus,
    PatientIdentity, PatientName, ValidatedResponse,
};
use logger_redacted::{mask_name, redact_member_id};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::error::McpResult;
use crate::protocol::ToolResult;
use crate::tools::{parse_arguments, McpTool, ToolContext, ToolsRegistry};

const PROVIDE_FIRST_NAME: &str = "Please provide your first name.";
const PROVIDE_LAST_NAME: &str = "Please provide your last name.";
const PROVIDE_MEMBER_ID: &str = "Please provide your member ID.";
const MEMBER_ID_TOO_SHORT: &str =
    "That member ID seems too short. Please provide your full member ID.";

/// Register all six eligibility tools
pub fn register_insurance_tools(registry: &mut ToolsRegistry) {
    registry.register(Box::new(CollectPatientNameTool));
    registry.register(Box::new(CollectMemberIdTool));
    registry.register(Box::new(RunStediQueryTool));
    registry.register(Box::new(ValidateStediResponseTool));
    registry.register(Box::new(CheckInsuranceActiveTool));
    registry.register(Box::new(FindStc98CopayTool));
}

/// Log a pipeline failure and turn it into the sentence the agent speaks
fn spoken_failure(operation: &str, error: &InsuranceError) -> ToolResult {
    report(operation, error);
    ToolResult::coded_error(error.error_code(), error.user_message())
}

fn no_eligibility_data(operation: &str) -> ToolResult {
    warn!(operation, "no_eligibility_data");
    ToolResult::coded_error(
        codes::eligibility::NO_ELIGIBILITY_DATA,
        messages::NO_ELIGIBILITY_DATA,
    )
}

fn empty_object_schema() -> Value {
    json!({ "type": "object", "properties": {} })
}

/// Validated document for the interpreters, validating the stored raw
/// response on first use
async fn validated_response(
    operation: &str,
    context: &ToolContext,
) -> Result<ValidatedResponse, ToolResult> {
    let mut state = context.session.state().await;
    if let Some(validated) = &state.validated {
        return Ok(validated.clone());
    }
    let Some(raw) = state.raw_response.clone() else {
        return Err(no_eligibility_data(operation));
    };
    match context.service.checker().validate_response(raw) {
        Ok(validated) => {
            state.validated = Some(validated.clone());
            Ok(validated)
        }
        Err(e) => Err(spoken_failure(operation, &e)),
    }
}

pub struct CollectPatientNameTool;

#[derive(Debug, Deserialize)]
struct PatientNameArgs {
    first_name: String,
    last_name: String,
}

#[async_trait]
impl McpTool for CollectPatientNameTool {
    fn name(&self) -> &str {
        "collect_patient_name"
    }

    fn description(&self) -> &str {
        "Store and confirm patient's first and last name."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "first_name": { "type": "string", "description": "Patient first name" },
                "last_name": { "type": "string", "description": "Patient last name" }
            },
            "required": ["first_name", "last_name"]
        })
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        let args: PatientNameArgs = parse_arguments(arguments)?;
        info!(
            first_name = %mask_name(args.first_name.trim()),
            last_name = %mask_name(args.last_name.trim()),
            "collect_patient_name"
        );

        if args.first_name.trim().is_empty() {
            return Ok(ToolResult::error(PROVIDE_FIRST_NAME));
        }
        if args.last_name.trim().is_empty() {
            return Ok(ToolResult::error(PROVIDE_LAST_NAME));
        }
        let name = match PatientName::new(&args.first_name, &args.last_name) {
            Ok(name) => name,
            Err(e) => return Ok(spoken_failure(self.name(), &e)),
        };

        let message = format!("Got it. I have {}. Is that correct?", name);
        let mut state = context.session.state().await;
        state.name = Some(name);
        state.reset_lookup();

        Ok(ToolResult::success(json!({
            "status": "success",
            "message": message,
        })))
    }
}

pub struct CollectMemberIdTool;

#[derive(Debug, Deserialize)]
struct MemberIdArgs {
    member_id: String,
}

#[async_trait]
impl McpTool for CollectMemberIdTool {
    fn name(&self) -> &str {
        "collect_member_id"
    }

    fn description(&self) -> &str {
        "Store and confirm insurance member ID. Accepts spoken forms such as \
         'A E T N A one two three four five'."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "member_id": { "type": "string", "description": "Member ID as heard from the caller" }
            },
            "required": ["member_id"]
        })
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        let args: MemberIdArgs = parse_arguments(arguments)?;

        if args.member_id.trim().is_empty() {
            return Ok(ToolResult::error(PROVIDE_MEMBER_ID));
        }
        let normalized = match normalize_member_id(&args.member_id) {
            Ok(normalized) => normalized,
            Err(e) => return Ok(spoken_failure(self.name(), &e)),
        };
        info!(member_id = %redact_member_id(&normalized), "collect_member_id");

        if normalized.len() < MIN_MEMBER_ID_LEN {
            warn!(length = normalized.len(), "member_id_too_short");
            return Ok(ToolResult::error(MEMBER_ID_TOO_SHORT));
        }

        let message = format!("I have member ID: {}. Is that correct?", spell_out(&normalized));
        let mut state = context.session.state().await;
        state.member_id = Some(normalized);
        state.reset_lookup();

        Ok(ToolResult::success(json!({
            "status": "success",
            "message": message,
        })))
    }
}

pub struct RunStediQueryTool;

#[derive(Debug, Default, Deserialize)]
struct StediQueryArgs {
    first_name: Option<String>,
    last_name: Option<String>,
    member_id: Option<String>,
}

#[async_trait]
impl McpTool for RunStediQueryTool {
    fn name(&self) -> &str {
        "run_stedi_query"
    }

    fn description(&self) -> &str {
        "Query STEDI API for insurance eligibility. Arguments default to the \
         name and member ID collected earlier in the session."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "first_name": { "type": "string" },
                "last_name": { "type": "string" },
                "member_id": { "type": "string" }
            }
        })
    }

    async fn execute(&self, arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        let args: StediQueryArgs = parse_arguments(arguments)?;

        // A new query supersedes the previous document even if it fails
        let (first_name, last_name, member_id) = {
            let mut state = context.session.state().await;
            state.reset_lookup();
            let stored = state.name.as_ref();
            (
                args.first_name.or_else(|| stored.map(|n| n.first.clone())),
                args.last_name.or_else(|| stored.map(|n| n.last.clone())),
                args.member_id.or_else(|| state.member_id.clone()),
            )
        };

        let Some(first_name) = first_name.filter(|s| !s.trim().is_empty()) else {
            return Ok(ToolResult::error(PROVIDE_FIRST_NAME));
        };
        let Some(last_name) = last_name.filter(|s| !s.trim().is_empty()) else {
            return Ok(ToolResult::error(PROVIDE_LAST_NAME));
        };
        let Some(member_id) = member_id.filter(|s| !s.trim().is_empty()) else {
            return Ok(ToolResult::error(PROVIDE_MEMBER_ID));
        };

        let identity = match PatientName::new(&first_name, &last_name)
            .and_then(|name| PatientIdentity::new(name, &member_id))
        {
            Ok(identity) => identity,
            Err(e) => return Ok(spoken_failure(self.name(), &e)),
        };
        info!(
            first_name = %mask_name(&identity.name().first),
            last_name = %mask_name(&identity.name().last),
            member_id = %redact_member_id(identity.member_id()),
            "run_stedi_query"
        );

        let cancel = context.session.cancellation();
        let response = match context.service.lookup(&identity, &cancel).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "stedi_query_failed");
                return Ok(spoken_failure(self.name(), &e));
            }
        };

        let mut state = context.session.state().await;
        state.name = Some(identity.name().clone());
        state.member_id = Some(identity.member_id().to_string());
        state.raw_response = Some(response);

        Ok(ToolResult::success(json!({
            "status": "success",
            "message": "Successfully retrieved eligibility information",
        })))
    }
}

pub struct ValidateStediResponseTool;

#[async_trait]
impl McpTool for ValidateStediResponseTool {
    fn name(&self) -> &str {
        "validate_stedi_response"
    }

    fn description(&self) -> &str {
        "Validate the STEDI API response stored in session."
    }

    fn input_schema(&self) -> Value {
        empty_object_schema()
    }

    async fn execute(&self, _arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        info!("validate_stedi_response");

        let mut state = context.session.state().await;
        let Some(raw) = state.raw_response.clone() else {
            return Ok(no_eligibility_data(self.name()));
        };

        match context.service.checker().validate_response(raw) {
            Ok(validated) => {
                state.validated = Some(validated);
                Ok(ToolResult::success(json!({
                    "status": "valid",
                    "message": "Eligibility information validated successfully",
                })))
            }
            Err(e) => {
                state.validated = None;
                Ok(spoken_failure(self.name(), &e))
            }
        }
    }
}

pub struct CheckInsuranceActiveTool;

#[async_trait]
impl McpTool for CheckInsuranceActiveTool {
    fn name(&self) -> &str {
        "check_insurance_active"
    }

    fn description(&self) -> &str {
        "Check if the insurance coverage is active."
    }

    fn input_schema(&self) -> Value {
        empty_object_schema()
    }

    async fn execute(&self, _arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        info!("check_insurance_active");

        let validated = match validated_response(self.name(), context).await {
            Ok(validated) => validated,
            Err(failure) => return Ok(failure),
        };
        let result = context.service.checker().check_active_coverage(&validated);

        let (status, message) = match result.status {
            CoverageStatus::Active => ("active", "Coverage is active"),
            CoverageStatus::Inactive => {
                warn!(status = ?result.status_text, "insurance_not_active");
                ("inactive", "Coverage appears to be inactive")
            }
            CoverageStatus::Unknown => {
                warn!("insurance_status_unknown");
                (
                    "unknown",
                    "I couldn't confirm whether your coverage is active from the information returned",
                )
            }
        };

        let payload = json!({
            "status": status,
            "message": message,
            "is_active": result.status.as_bool(),
            "details": {
                "status": result.status_text,
                "status_code": result.status_code,
            },
        });
        context.session.state().await.coverage = Some(result);

        Ok(ToolResult::success(payload))
    }
}

pub struct FindStc98CopayTool;

#[async_trait]
impl McpTool for FindStc98CopayTool {
    fn name(&self) -> &str {
        "find_stc98_copay"
    }

    fn description(&self) -> &str {
        "Find office visit copay (service type code 98)."
    }

    fn input_schema(&self) -> Value {
        empty_object_schema()
    }

    async fn execute(&self, _arguments: Value, context: &ToolContext) -> McpResult<ToolResult> {
        info!("find_stc98_copay");

        let validated = match validated_response(self.name(), context).await {
            Ok(validated) => validated,
            Err(failure) => return Ok(failure),
        };
        let result = context.service.copay_finder().find_office_visit_copay(&validated);
        let network_status = serde_json::to_value(result.network_status)?;

        let payload = match (result.amount, result.network_status) {
            (Some(amount), _) => json!({
                "status": "found",
                "amount": amount.to_string(),
                "network_status": network_status,
                "message": format!(
                    "Great news! Your copay for in-network office visits is ${}. \
                     This applies when you see providers in your insurance network.",
                    amount
                ),
            }),
            (None, NetworkStatus::OutOfNetwork) => json!({
                "status": "not_found",
                "network_status": network_status,
                "message": "I only found copay details for out-of-network office visits. \
                            For in-network coverage details, please contact your insurance provider.",
            }),
            (None, _) => json!({
                "status": "not_found",
                "network_status": network_status,
                "message": "I couldn't find specific copay details for office visits \
                            in your benefits. I recommend contacting your insurance \
                            provider directly for this information.",
            }),
        };
        context.session.state().await.copay = Some(result);

        Ok(ToolResult::success(payload))
    }
}
