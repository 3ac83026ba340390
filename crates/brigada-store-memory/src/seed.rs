//! Demo roster loaded by [`MemoryStore::seeded`](crate::MemoryStore::seeded).

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};

use brigada_core::{
  citation::{ActivityType, Citation, CitationStatus},
  personnel::{Personnel, PersonnelStatus},
};

use PersonnelStatus::{Active, Inactive, OnLeave};

type MemberRow = (
  &'static str,
  &'static str,
  &'static str,
  Option<&'static str>,
  PersonnelStatus,
  &'static str,
  &'static str,
  &'static str,
  (i32, u32, u32),
);

#[rustfmt::skip]
const MEMBERS: &[MemberRow] = &[
  ("Juan Carlos", "González Muñoz", "Comandante", Some("Rescate Vehicular"), Active,
   "+56 9 1234 5678", "juan.gonzalez", "Av. Libertad 123", (2015, 3, 15)),
  ("María Paz", "Rojas Silva", "Capitán", Some("Materiales Peligrosos"), Active,
   "+56 9 2345 6789", "maria.rojas", "Calle Valparaíso 456", (2016, 7, 20)),
  ("Pedro Antonio", "Díaz Pérez", "Teniente", Some("Incendios Forestales"), Active,
   "+56 9 3456 7890", "pedro.diaz", "Pasaje Los Héroes 789", (2017, 11, 5)),
  ("Ana Isabel", "Soto Contreras", "Sargento", Some("Primeros Auxilios"), Active,
   "+56 9 4567 8901", "ana.soto", "Av. Marina 321", (2018, 2, 14)),
  ("Luis Fernando", "Martínez López", "Cabo", Some("Rescate en Altura"), Active,
   "+56 9 5678 9012", "luis.martinez", "Calle Quillota 654", (2019, 6, 30)),
  ("Carolina Andrea", "Sepúlveda Morales", "Bombero", None, Active,
   "+56 9 6789 0123", "carolina.sepulveda", "Pasaje Los Robles 987", (2020, 9, 12)),
  ("Roberto Carlos", "Rodríguez Torres", "Bombero", None, OnLeave,
   "+56 9 7890 1234", "roberto.rodriguez", "Av. España 147", (2021, 1, 25)),
  ("Patricia Elena", "Fuentes Hernández", "Bombero", None, Active,
   "+56 9 8901 2345", "patricia.fuentes", "Calle Arlegui 258", (2022, 4, 18)),
  ("Diego Alejandro", "Flores Espinoza", "Bombero", None, Active,
   "+56 9 9012 3456", "diego.flores", "Pasaje San Martín 369", (2023, 8, 7)),
  ("Valentina Sofía", "Valenzuela Castillo", "Bombero", None, Inactive,
   "+56 9 0123 4567", "valentina.valenzuela", "Av. Agua Santa 741", (2024, 2, 20)),
];

fn ten_am(date: NaiveDate) -> DateTime<Utc> {
  Utc.from_utc_datetime(&date.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default()))
}

pub(crate) fn personnel() -> Vec<Personnel> {
  let last_review = NaiveDate::from_ymd_opt(2025, 10, 24).map(ten_am);

  MEMBERS
    .iter()
    .zip(1..)
    .filter_map(
      |(&(given, surnames, rank, specialty, status, phone, mailbox, street, (y, m, d)), id)| {
        let joined = NaiveDate::from_ymd_opt(y, m, d)?;
        let created_at = ten_am(joined);
        Some(Personnel {
          id,
          given_names: given.to_owned(),
          surnames: surnames.to_owned(),
          rank: rank.to_owned(),
          specialty: specialty.map(str::to_owned),
          status,
          phone: Some(phone.to_owned()),
          email: Some(format!("{mailbox}@bomberos.cl")),
          address: Some(format!("{street}, Viña del Mar")),
          joined_on: Some(joined),
          photo_ref: Some(format!("/assets/bomberos/bombero-{}.jpg", (id - 1) % 8 + 1)),
          created_at,
          updated_at: last_review.unwrap_or(created_at),
        })
      },
    )
    .collect()
}

pub(crate) fn citations(now: DateTime<Utc>) -> Vec<Citation> {
  let local_now = now.naive_utc();
  let c = |id: i64,
           title: &str,
           description: &str,
           in_days: i64,
           location: &str,
           activity_type: ActivityType,
           status: CitationStatus,
           (required, confirmed): (u32, u32),
           cited: &[i64],
           created_by: &str,
           created_days_ago: i64,
           remarks: Option<&str>| Citation {
    id,
    title: title.to_owned(),
    description: description.to_owned(),
    scheduled_at: local_now + Duration::days(in_days),
    location: location.to_owned(),
    activity_type,
    status,
    required_attendees: required,
    confirmed_attendees: confirmed,
    cited_personnel: cited.to_vec(),
    created_by: created_by.to_owned(),
    created_at: now - Duration::days(created_days_ago),
    remarks: remarks.map(str::to_owned),
  };

  vec![
    c(
      1,
      "Entrenamiento de Rescate",
      "Práctica de técnicas de rescate en altura y espacios confinados",
      3,
      "Cuartel Central - Segunda Compañía",
      ActivityType::Training,
      CitationStatus::Pending,
      (15, 8),
      &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15],
      "Cap. Juan Pérez",
      2,
      Some("Traer equipo completo y uniforme de trabajo"),
    ),
    c(
      2,
      "Guardia Nocturna",
      "Turno de guardia nocturna en el cuartel",
      1,
      "Cuartel Central",
      ActivityType::Duty,
      CitationStatus::Confirmed,
      (8, 8),
      &[2, 3, 5, 7, 9, 10, 12, 14],
      "Tte. Carlos Ramírez",
      5,
      None,
    ),
    c(
      3,
      "Reunión Mensual",
      "Reunión administrativa mensual de la compañía",
      7,
      "Sala de Juntas",
      ActivityType::Meeting,
      CitationStatus::Pending,
      (10, 3),
      &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
      "Cmd. Roberto Silva",
      1,
      Some("Traer informes del mes"),
    ),
    c(
      4,
      "Ceremonia del Día del Bombero",
      "Ceremonia oficial en conmemoración del Día del Bombero Chileno",
      10,
      "Plaza de Armas",
      ActivityType::Ceremony,
      CitationStatus::Pending,
      (30, 12),
      &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10],
      "Cmd. Roberto Silva",
      7,
      Some("Uniforme de gala. Formación a las 09:00 hrs."),
    ),
    c(
      5,
      "Ejercicio de Evacuación",
      "Simulacro de evacuación en edificio de gran altura",
      -2,
      "Edificio Torre Norte",
      ActivityType::Drill,
      CitationStatus::Completed,
      (12, 12),
      &[1, 3, 5, 7, 9, 11, 13, 15, 2, 4, 6, 8],
      "Cap. Juan Pérez",
      10,
      Some("Coordinación con Carabineros y SAMU"),
    ),
  ]
}
