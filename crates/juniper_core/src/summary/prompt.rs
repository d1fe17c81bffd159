//! Prompt rendering for the day summary.

use crate::projection::day::DayReport;

/// Renders the Korean-language prompt sent to the text generator.
///
/// Only counts, totals and the day's new notice are included; names and
/// phone numbers never leave the device.
pub fn build_summary_prompt(report: &DayReport) -> String {
    format!(
        "다음은 주니퍼실용음악학원의 일일 결산 내역입니다.\n\
         오늘의 운영 현황을 한 문장으로 요약하고, 특이사항이나 개선 제안을 간단히 적어주세요.\n\
         \n\
         날짜: {date}\n\
         담당자: {manager}\n\
         상담 건수: {consultations}\n\
         체험레슨 예약: {reservations}\n\
         총 지출: {expenses}원\n\
         총 매출: {revenue}원\n\
         전달사항: {notice}\n",
        date = report.date,
        manager = report.manager,
        consultations = report.consultations.len(),
        reservations = report.reservations.len(),
        expenses = report.totals.expenses,
        revenue = report.totals.revenue,
        notice = report.new_notice,
    )
}
