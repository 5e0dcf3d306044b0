use arrow::{array::AsArray, compute::cast, datatypes::DataType, record_batch::RecordBatch};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook};
use std::path::Path;

use crate::error::Cause;

/// Name of the single worksheet in every report.
pub const SHEET_NAME: &str = "Sheet1";

/// Write `table` as a one-sheet workbook: a bold header row with the column
/// names, then one row per record. Null cells are left blank and no index
/// column is written.
pub fn write_xlsx(table: &RecordBatch, destination: &Path) -> Result<(), Cause> {
    let mut workbook = Workbook::new();
    let header = Format::new()
        .set_bold()
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center);

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let schema = table.schema();
    for (idx, (field, array)) in schema.fields().iter().zip(table.columns()).enumerate() {
        let col = u16::try_from(idx)?;
        worksheet.write_string_with_format(0, col, field.name(), &header)?;

        let values = cast(array, &DataType::Utf8)?;
        for (row, value) in values.as_string::<i32>().iter().enumerate() {
            if let Some(value) = value {
                worksheet.write_string(u32::try_from(row + 1)?, col, value)?;
            }
        }
    }

    workbook.save(destination)?;
    Ok(())
}
