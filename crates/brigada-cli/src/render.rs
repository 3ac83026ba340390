//! Plain-text rendering of records for the terminal.

use std::fmt::Write as _;

use brigada_core::{auth::User, citation::Citation, personnel::Personnel, stats::Stats};

pub fn personnel_table(rows: &[Personnel]) -> String {
  if rows.is_empty() {
    return "No personnel found.\n".into();
  }
  let mut out = String::new();
  let _ = writeln!(out, "{:>4}  {:<36}  {:<12}  {:<10}  {}", "ID", "NAME", "RANK", "STATUS", "SPECIALTY");
  for p in rows {
    let _ = writeln!(
      out,
      "{:>4}  {:<36}  {:<12}  {:<10}  {}",
      p.id,
      p.full_name(),
      p.rank,
      p.status.as_ref(),
      p.specialty.as_deref().unwrap_or("-"),
    );
  }
  out
}

pub fn personnel(p: &Personnel) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "#{} {}", p.id, p.full_name());
  let field = |out: &mut String, label: &str, value: Option<&str>| {
    let _ = writeln!(out, "  {label:<10} {}", value.unwrap_or("-"));
  };
  field(&mut out, "Rank", Some(p.rank.as_str()));
  field(&mut out, "Status", Some(p.status.as_ref()));
  field(&mut out, "Specialty", p.specialty.as_deref());
  field(&mut out, "Phone", p.phone.as_deref());
  field(&mut out, "Email", p.email.as_deref());
  field(&mut out, "Address", p.address.as_deref());
  let joined = p.joined_on.map(|d| d.format("%Y-%m-%d").to_string());
  field(&mut out, "Joined", joined.as_deref());
  out
}

pub fn citation_table(rows: &[Citation]) -> String {
  if rows.is_empty() {
    return "No citations found.\n".into();
  }
  let mut out = String::new();
  let _ = writeln!(
    out,
    "{:>4}  {:<16}  {:<32}  {:<13}  {:<11}  {}",
    "ID", "WHEN", "TITLE", "ACTIVITY", "STATUS", "ATTENDANCE"
  );
  for c in rows {
    let _ = writeln!(
      out,
      "{:>4}  {:<16}  {:<32}  {:<13}  {:<11}  {}/{}",
      c.id,
      c.scheduled_at.format("%Y-%m-%d %H:%M"),
      c.title,
      c.activity_type.to_string(),
      c.status.to_string(),
      c.confirmed_attendees,
      c.required_attendees,
    );
  }
  out
}

pub fn citation(c: &Citation) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "#{} {} [{}]", c.id, c.title, c.status);
  let _ = writeln!(out, "  {}", c.description);
  let _ = writeln!(out, "  When       {}", c.scheduled_at.format("%Y-%m-%d %H:%M"));
  let _ = writeln!(out, "  Where      {}", c.location);
  let _ = writeln!(out, "  Activity   {}", c.activity_type);
  let _ = writeln!(
    out,
    "  Attendance {}/{} ({} outstanding)",
    c.confirmed_attendees,
    c.required_attendees,
    c.outstanding()
  );
  let _ = writeln!(out, "  Cited      {} members", c.cited_personnel.len());
  let _ = writeln!(out, "  By         {}", c.created_by);
  if let Some(remarks) = &c.remarks {
    let _ = writeln!(out, "  Remarks    {remarks}");
  }
  out
}

pub fn stats(s: &Stats) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Total       {}", s.total);
  let _ = writeln!(out, "Active      {}", s.total_active);
  let _ = writeln!(out, "Inactive    {}", s.total_inactive);
  let _ = writeln!(out, "New (month) {}", s.new_last_month);
  let _ = writeln!(out, "By rank:");
  for r in &s.by_rank {
    let _ = writeln!(out, "  {:<12} {}", r.rank, r.count);
  }
  out
}

pub fn user(u: &User) -> String {
  let kind = if u.is_admin() { "admin" } else { "member" };
  format!("{} <{}> ({}, {kind})\n", u.name, u.email, u.role)
}
