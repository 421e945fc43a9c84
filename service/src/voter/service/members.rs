//! Member ingestion and chamber listings

use serde::Serialize;
use utoipa::ToSchema;

use super::ServiceError;
use crate::congress::{Chamber, CongressApiClient, CongressApiError, RosterMember};
use crate::normalize::{full_name, parse_election_year};
use crate::voter::repo::{RepresentativeRecord, VoterRepo};

/// Per-chamber counts from [`load_members`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChamberSummary {
    pub inserted: u64,
    /// Already stored (same member id or name)
    pub existing: u64,
    pub out_of_office: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MemberIngestSummary {
    pub senate: ChamberSummary,
    pub house: ChamberSummary,
}

/// Senators and House members, each sorted by name.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CongressListing {
    pub senators: Vec<RepresentativeRecord>,
    pub house: Vec<RepresentativeRecord>,
}

fn to_record(member: RosterMember) -> Result<RepresentativeRecord, CongressApiError> {
    let next_election = match member.next_election.as_deref() {
        None | Some("") => None,
        Some(year) => Some(parse_election_year(year).ok_or_else(|| {
            CongressApiError::Schema(format!(
                "member {}: next_election {year:?} is not a year",
                member.id
            ))
        })?),
    };

    Ok(RepresentativeRecord {
        name: full_name(&member.first_name, &member.last_name),
        external_id: member.id,
        title: member.title,
        party: member.party,
        phone: member.phone,
        next_election,
        twitter: member.twitter_account,
        facebook: member.facebook_account,
        youtube: member.youtube_account,
    })
}

/// Fetch the Senate then House rosters and store every member in office.
///
/// Each member is committed as it is processed, so a failure part-way keeps
/// the members already stored. Members already present are skipped, which
/// makes re-running safe.
///
/// # Errors
///
/// Returns `ServiceError::Congress` if a roster cannot be fetched or a member
/// record is malformed, aborting the run; `ServiceError::Repo` on database
/// failures.
pub async fn load_members(
    repo: &dyn VoterRepo,
    congress: &dyn CongressApiClient,
) -> Result<MemberIngestSummary, ServiceError> {
    let mut summary = MemberIngestSummary::default();

    for chamber in [Chamber::Senate, Chamber::House] {
        let members = congress.list_members(chamber).await?;
        let counts = match chamber {
            Chamber::Senate => &mut summary.senate,
            Chamber::House => &mut summary.house,
        };

        for member in members {
            if !member.in_office {
                counts.out_of_office += 1;
                continue;
            }
            let record = to_record(member)?;
            if repo.insert_representative(&record).await? {
                counts.inserted += 1;
            } else {
                counts.existing += 1;
            }
        }

        tracing::info!(
            %chamber,
            inserted = counts.inserted,
            skipped = counts.existing + counts.out_of_office,
            "Loaded chamber roster"
        );
    }

    Ok(summary)
}

/// # Errors
///
/// Returns `ServiceError::Repo` on database failures.
pub async fn congress_listing(repo: &dyn VoterRepo) -> Result<CongressListing, ServiceError> {
    Ok(CongressListing {
        senators: repo.list_senators().await?,
        house: repo.list_house_members().await?,
    })
}
