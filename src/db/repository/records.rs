use rusqlite::Connection;

use crate::db::DatabaseError;
use crate::models::{Medication, Patient, VitalsRecord};

use super::{insert_medication, insert_patient, insert_vitals};

/// Insert a patient together with an optional first vitals record and any
/// number of medications. Either everything is stored or nothing is.
pub fn create_patient_with_records(
    conn: &Connection,
    patient: &Patient,
    vitals: Option<&VitalsRecord>,
    medications: &[Medication],
) -> Result<(), DatabaseError> {
    let tx = conn.unchecked_transaction()?;

    insert_patient(&tx, patient)?;
    if let Some(vitals) = vitals {
        insert_vitals(&tx, vitals)?;
    }
    for med in medications {
        insert_medication(&tx, med)?;
    }

    tx.commit()?;
    tracing::info!(
        patient_id = %patient.id,
        with_vitals = vitals.is_some(),
        medications = medications.len(),
        "Patient intake stored"
    );
    Ok(())
}
