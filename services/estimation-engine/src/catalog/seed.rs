//! Built-in price list loaded when no external price list is configured.

use lumber_models::CatalogItem;

/// id, description, category, subcategory, dimensions, material, grade,
/// unit price, unit, optional [length ft, width in, thickness in].
struct SeedRow(
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    &'static str,
    f64,
    &'static str,
    Option<[f64; 3]>,
);

const SEED: &[SeedRow] = &[
    // Walls
    SeedRow("2X4X104-5/8_KD_HF", "2X4X104-5/8 KD HF STUD", "Walls", "Studs", "2X4X104-5/8", "KD HF", "STUD", 4.37, "lf", Some([8.72, 4.0, 2.0])),
    SeedRow("2X4X12_KD_HFIR", "2X4X12 KD H-FIR STD&BTR", "Walls", "Studs", "2X4X12", "KD H-FIR", "STD&BTR", 5.71, "lf", Some([12.0, 4.0, 2.0])),
    SeedRow("2X4X16_SYP_BORATES", "2X4X16 SYP #3 BORATES INT", "Walls", "Studs", "2X4X16", "SYP", "#3 BORATES INT", 8.77, "lf", Some([16.0, 4.0, 2.0])),
    SeedRow("2X4X12_KD_HFIR_2", "2X4X12 KD H-FIR STD&BTR", "Walls", "Studs", "2X4X12", "KD H-FIR", "STD&BTR", 5.85, "lf", Some([12.0, 4.0, 2.0])),
    SeedRow("2X4X14_KD_HFIR", "2X4X14 KD H-FIR STD&BTR", "Walls", "Studs", "2X4X14", "KD H-FIR", "STD&BTR", 7.63, "lf", Some([14.0, 4.0, 2.0])),
    SeedRow("2X4X16_KD_HFIR", "2X4X16 KD H-FIR STD&BTR", "Walls", "Studs", "2X4X16", "KD H-FIR", "STD&BTR", 8.71, "lf", Some([16.0, 4.0, 2.0])),
    SeedRow("2X4X140-5/8_FJ_KD_SPF", "2X4X140-5/8 FJ KD SPF", "Walls", "Studs", "2X4X140-5/8", "FJ KD SPF", "STUD", 6.79, "lf", Some([11.72, 4.0, 2.0])),
    SeedRow("2X6X12_KD_HFIR", "2X6X12 KD H-FIR #2&BTR", "Walls", "Studs", "2X6X12", "KD H-FIR", "#2&BTR", 8.25, "lf", Some([12.0, 6.0, 2.0])),
    SeedRow("2X6X140-5/8_FJ_KD_SPF", "2X6X140-5/8 FJ KD SPF", "Walls", "Studs", "2X6X140-5/8", "FJ KD SPF", "STUD", 9.89, "lf", Some([11.72, 6.0, 2.0])),
    SeedRow("2X6X16_SYP_BORATES", "2X6X16 SYP #3 BORATES INT", "Walls", "Studs", "2X6X16", "SYP", "#3 BORATES INT", 13.55, "lf", Some([16.0, 6.0, 2.0])),
    SeedRow("2X6X16_KD_HFIR", "2X6X16 KD H-FIR #2&BTR", "Walls", "Studs", "2X6X16", "KD H-FIR", "#2&BTR", 11.54, "lf", Some([16.0, 6.0, 2.0])),
    SeedRow("LVL_1-3/4X16X20", "1-3/4X16X20 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X16X20", "LVL", "2.0BTR", 165.41, "each", Some([20.0, 16.0, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X28", "1-3/4X11-7/8X28 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X28", "LVL", "2.0BTR", 204.57, "each", Some([28.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X22", "1-3/4X11-7/8X22 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X22", "LVL", "2.0BTR", 124.52, "each", Some([22.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X20", "1-3/4X11-7/8X20 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X20", "LVL", "2.0BTR", 116.21, "each", Some([20.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X18", "1-3/4X11-7/8X18 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X18", "LVL", "2.0BTR", 127.42, "each", Some([18.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X16", "1-3/4X11-7/8X16 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X16", "LVL", "2.0BTR", 108.22, "each", Some([16.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X14", "1-3/4X11-7/8X14 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X14", "LVL", "2.0BTR", 97.72, "each", Some([14.0, 11.875, 1.75])),
    SeedRow("LVL_1-3/4X11-7/8X12", "1-3/4X11-7/8X12 LVL 2.0BTR", "Walls", "LVL Beams", "1-3/4X11-7/8X12", "LVL", "2.0BTR", 79.2, "each", Some([12.0, 11.875, 1.75])),
    SeedRow("2X12X12_KD_HFIR", "2X12X12 KD H-FIR #2&BTR", "Walls", "Headers", "2X12X12", "KD H-FIR", "#2&BTR", 19.99, "lf", Some([12.0, 12.0, 2.0])),
    SeedRow("2X12X14_KD_HFIR", "2X12X14 KD H-FIR #2&BTR", "Walls", "Headers", "2X12X14", "KD H-FIR", "#2&BTR", 30.25, "lf", Some([14.0, 12.0, 2.0])),
    SeedRow("LVL_3-1/2X5-1/2", "3-1/2X5-1/2 LVL 1.7E", "Walls", "LVL Beams", "3-1/2X5-1/2", "LVL", "1.7E", 8.92, "lf", Some([1.0, 5.5, 3.5])),
    SeedRow("HEX_NUT_1/2_ZINC", "1/2 HEX NUT ZINC", "Walls", "Fasteners", "1/2", "ZINC", "HEX", 0.17, "each", None),
    SeedRow("FLAT_WASHER_1/2_ZINC", "1/2 USS FLAT WASHER ZINC", "Walls", "Fasteners", "1/2", "ZINC", "USS", 0.19, "each", None),
    SeedRow("STB2-50414F25", "STB2-50414F25 1/2X4-1/4", "Walls", "Fasteners", "1/2X4-1/4", "STEEL", "STB2", 1.04, "each", None),
    SeedRow("OSB_7/16X4X8", "7/16X4X8 OSB", "Walls", "Sheathing", "7/16X4X8", "OSB", "STANDARD", 9.7, "sheet", Some([8.0, 4.0, 0.4375])),
    SeedRow("ZIP_WALL_7/16X4X10", "7/16X4X10 ZIP WALL", "Walls", "Sheathing", "7/16X4X10", "ZIP", "WALL", 31.84, "sheet", Some([10.0, 4.0, 0.4375])),
    SeedRow("ZIP_TAPE_30YD", "ZIP TAPE 30 YD", "Walls", "Fasteners", "30 YD", "ZIP", "TAPE", 31.54, "roll", None),
    SeedRow("2X6_RAFTER_16", "2X6 RAFTER 16'", "Walls", "Generic", "2X6X16", "KD H-FIR", "#2&BTR", 16.11, "each", Some([16.0, 6.0, 2.0])),
    SeedRow("2X4_STUD_8", "2X4 STUD 8'", "Walls", "Generic", "2X4X8", "KD H-FIR", "STD&BTR", 5.71, "each", Some([8.0, 4.0, 2.0])),
    SeedRow("2X4_TOP_PLATE_12", "2X4 TOP PLATE 12'", "Walls", "Generic", "2X4X12", "KD H-FIR", "STD&BTR", 5.71, "lf", Some([12.0, 4.0, 2.0])),
    SeedRow("2X4_BOTTOM_PLATE_12", "2X4 BOTTOM PLATE 12'", "Walls", "Generic", "2X4X12", "KD H-FIR", "STD&BTR", 5.71, "lf", Some([12.0, 4.0, 2.0])),
    SeedRow("PLYWOOD_SHEATHING_4X8", "Plywood Sheathing 4x8", "Walls", "Sheathing", "4X8", "PLYWOOD", "STANDARD", 12.5, "sheet", Some([8.0, 4.0, 0.5])),
    SeedRow("2X6_FASCIA_12", "2X6 Fascia 12'", "Walls", "Trim", "2X6X12", "KD H-FIR", "#2&BTR", 8.25, "lf", Some([12.0, 6.0, 2.0])),
    SeedRow("ROOF_SHINGLES", "Roof Shingles", "Roof", "Shingles", "STANDARD", "ASPHALT", "3-TAB", 45.0, "square", Some([100.0, 0.0, 0.0])),
    SeedRow("FLASHING", "Flashing", "Roof", "Flashing", "STANDARD", "ALUMINUM", "COIL", 2.5, "lf", Some([10.0, 0.0, 0.0])),
    SeedRow("NAILS_3IN", "3 inch Nails", "Structural", "Fasteners", "3IN", "STEEL", "GALVANIZED", 8.99, "pack", Some([0.0, 0.0, 0.0])),
    SeedRow("SCREWS_3IN", "3 inch Screws", "Structural", "Fasteners", "3IN", "STEEL", "PHILLIPS", 12.99, "pack", Some([0.0, 0.0, 0.0])),
    SeedRow("OSB_SHEATHING_4X8", "OSB Sheathing 4x8", "Walls", "Sheathing", "4X8", "OSB", "STANDARD", 9.7, "sheet", Some([8.0, 4.0, 0.4375])),
    SeedRow("2X8_RAFTER_16", "2X8 Rafter 16'", "Roof", "Rafters", "2X8X16", "KD H-FIR", "#2&BTR", 21.67, "each", Some([16.0, 8.0, 2.0])),
    SeedRow("2X10_RAFTER_16", "2X10 Rafter 16'", "Roof", "Rafters", "2X10X16", "KD H-FIR", "#2&BTR", 28.5, "each", Some([16.0, 10.0, 2.0])),
    SeedRow("2X12_RAFTER_16", "2X12 Rafter 16'", "Roof", "Rafters", "2X12X16", "KD H-FIR", "#2&BTR", 34.19, "each", Some([16.0, 12.0, 2.0])),
    SeedRow("2X6_RAFTER_12", "2X6 Rafter 12'", "Roof", "Rafters", "2X6X12", "KD H-FIR", "#2&BTR", 12.79, "each", Some([12.0, 6.0, 2.0])),
    SeedRow("2X8_RAFTER_12", "2X8 Rafter 12'", "Roof", "Rafters", "2X8X12", "KD H-FIR", "#2&BTR", 16.52, "each", Some([12.0, 8.0, 2.0])),
    SeedRow("2X10_RAFTER_12", "2X10 Rafter 12'", "Roof", "Rafters", "2X10X12", "KD H-FIR", "#2&BTR", 22.0, "each", Some([12.0, 10.0, 2.0])),
    SeedRow("2X12_RAFTER_12", "2X12 Rafter 12'", "Roof", "Rafters", "2X12X12", "KD H-FIR", "#2&BTR", 29.39, "each", Some([12.0, 12.0, 2.0])),

    // Joist
    SeedRow("LVL_JOIST_1-3/4X16X24", "1-3/4X16X24 LVL 2.0BTR", "Joist", "LVL Joists", "1-3/4X16X24", "LVL", "2.0BTR", 200.95, "each", Some([24.0, 16.0, 1.75])),
    SeedRow("LVL_JOIST_1-3/4X11-7/8X12", "1-3/4X11-7/8X12 LVL 2.0BTR", "Joist", "LVL Joists", "1-3/4X11-7/8X12", "LVL", "2.0BTR", 81.37, "each", Some([12.0, 11.875, 1.75])),
    SeedRow("LVL_JOIST_1-3/4X11-7/8X16", "1-3/4X11-7/8X16 LVL 2.0BTR", "Joist", "LVL Joists", "1-3/4X11-7/8X16", "LVL", "2.0BTR", 111.19, "each", Some([16.0, 11.875, 1.75])),
    SeedRow("LVL_JOIST_1-3/4X11-7/8X14", "1-3/4X11-7/8X14 LVL 2.0BTR", "Joist", "LVL Joists", "1-3/4X11-7/8X14", "LVL", "2.0BTR", 100.4, "each", Some([14.0, 11.875, 1.75])),
    SeedRow("LVL_JOIST_1-3/4X11-7/8X20", "1-3/4X11-7/8X20 LVL 2.0BTR", "Joist", "LVL Joists", "1-3/4X11-7/8X20", "LVL", "2.0BTR", 119.39, "each", Some([20.0, 11.875, 1.75])),
    SeedRow("2X12X24_GDF_HF", "2X12X24 GDF/HF 2B", "Joist", "Dimensional Lumber", "2X12X24", "GDF/HF", "2B", 70.79, "lf", Some([24.0, 12.0, 2.0])),
    SeedRow("2X12X20_KD_HFIR", "2X12X20 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X12X20", "KD H-FIR", "#2&BTR", 34.19, "lf", Some([20.0, 12.0, 2.0])),
    SeedRow("2X12X18_KD_HFIR", "2X12X18 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X12X18", "KD H-FIR", "#2&BTR", 29.39, "lf", Some([18.0, 12.0, 2.0])),
    SeedRow("2X12X14_KD_HFIR_JOIST", "2X12X14 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X12X14", "KD H-FIR", "#2&BTR", 30.25, "lf", Some([14.0, 12.0, 2.0])),
    SeedRow("2X8X20_KD_HFIR", "2X8X20 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X8X20", "KD H-FIR", "#2&BTR", 21.67, "lf", Some([20.0, 8.0, 2.0])),
    SeedRow("2X8X18_KD_HFIR", "2X8X18 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X8X18", "KD H-FIR", "#2&BTR", 17.44, "lf", Some([18.0, 8.0, 2.0])),
    SeedRow("2X8X16_KD_HFIR", "2X8X16 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X8X16", "KD H-FIR", "#2&BTR", 16.11, "lf", Some([16.0, 8.0, 2.0])),
    SeedRow("2X8X14_KD_HFIR", "2X8X14 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X8X14", "KD H-FIR", "#2&BTR", 12.79, "lf", Some([14.0, 8.0, 2.0])),
    SeedRow("2X6X20_KD_HFIR", "2X6X20 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X20", "KD H-FIR", "#2&BTR", 14.07, "lf", Some([20.0, 6.0, 2.0])),
    SeedRow("2X6X18_KD_HFIR", "2X6X18 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X18", "KD H-FIR", "#2&BTR", 13.74, "lf", Some([18.0, 6.0, 2.0])),
    SeedRow("2X6X16_KD_HFIR_JOIST", "2X6X16 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X16", "KD H-FIR", "#2&BTR", 11.83, "lf", Some([16.0, 6.0, 2.0])),
    SeedRow("2X6X14_KD_HFIR", "2X6X14 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X14", "KD H-FIR", "#2&BTR", 8.8, "lf", Some([14.0, 6.0, 2.0])),
    SeedRow("2X6X12_KD_HFIR_JOIST", "2X6X12 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X12", "KD H-FIR", "#2&BTR", 8.45, "lf", Some([12.0, 6.0, 2.0])),
    SeedRow("2X6X10_KD_HFIR", "2X6X10 KD H-FIR #2&BTR", "Joist", "Dimensional Lumber", "2X6X10", "KD H-FIR", "#2&BTR", 6.7, "lf", Some([10.0, 6.0, 2.0])),
    SeedRow("HU412_25", "HU412 (25)", "Joist", "Hardware", "HU412", "STEEL", "25 PACK", 18.02, "pack", None),
    SeedRow("HU416_25", "HU416 (25)", "Joist", "Hardware", "HU416", "STEEL", "25 PACK", 23.09, "pack", None),

    // Roof
    SeedRow("LUS26Z_100", "LUS26Z (100)", "Roof", "Hardware", "LUS26Z", "STEEL", "100 PACK", 1.37, "pack", None),
    SeedRow("2X8X32_GDF_HF", "2X8X32 GDF/HF 2B", "Roof", "Rafters", "2X8X32", "GDF/HF", "2B", 106.69, "lf", Some([32.0, 8.0, 2.0])),
    SeedRow("2X8X28_GDF_HF", "2X8X28 GDF/HF 2B", "Roof", "Rafters", "2X8X28", "GDF/HF", "2B", 77.99, "lf", Some([28.0, 8.0, 2.0])),
    SeedRow("2X8X24_GDF_HF", "2X8X24 GDF/HF 2B", "Roof", "Rafters", "2X8X24", "GDF/HF", "2B", 34.69, "lf", Some([24.0, 8.0, 2.0])),
    SeedRow("2X8X22_GDF_HF", "2X8X22 GDF/HF 2B", "Roof", "Rafters", "2X8X22", "GDF/HF", "2B", 35.58, "lf", Some([22.0, 8.0, 2.0])),
    SeedRow("2X8X20_KD_HFIR_ROOF", "2X8X20 KD H-FIR #2&BTR", "Roof", "Rafters", "2X8X20", "KD H-FIR", "#2&BTR", 21.67, "lf", Some([20.0, 8.0, 2.0])),
    SeedRow("2X8X18_KD_HFIR_ROOF", "2X8X18 KD H-FIR #2&BTR", "Roof", "Rafters", "2X8X18", "KD H-FIR", "#2&BTR", 17.44, "lf", Some([18.0, 8.0, 2.0])),
    SeedRow("2X8X16_KD_HFIR_ROOF", "2X8X16 KD H-FIR #2&BTR", "Roof", "Rafters", "2X8X16", "KD H-FIR", "#2&BTR", 16.52, "lf", Some([16.0, 8.0, 2.0])),
    SeedRow("2X8X12_KD_HFIR_ROOF", "2X8X12 KD H-FIR #2&BTR", "Roof", "Rafters", "2X8X12", "KD H-FIR", "#2&BTR", 10.68, "lf", Some([12.0, 8.0, 2.0])),
    SeedRow("2X8X10_KD_HFIR_ROOF", "2X8X10 KD H-FIR #2&BTR", "Roof", "Rafters", "2X8X10", "KD H-FIR", "#2&BTR", 8.91, "lf", Some([10.0, 8.0, 2.0])),
    SeedRow("2X6X32_GDF_HF", "2X6X32 GDF/HF 2B", "Roof", "Rafters", "2X6X32", "GDF/HF", "2B", 71.03, "lf", Some([32.0, 6.0, 2.0])),
    SeedRow("2X6X30_GDF_HF", "2X6X30 GDF/HF 2B", "Roof", "Rafters", "2X6X30", "GDF/HF", "2B", 66.27, "lf", Some([30.0, 6.0, 2.0])),
    SeedRow("2X6X28_GDF_HF", "2X6X28 GDF/HF 2B", "Roof", "Rafters", "2X6X28", "GDF/HF", "2B", 64.82, "lf", Some([28.0, 6.0, 2.0])),
    SeedRow("2X6X26_GDF_HF", "2X6X26 GDF/HF 2B", "Roof", "Rafters", "2X6X26", "GDF/HF", "2B", 61.66, "lf", Some([26.0, 6.0, 2.0])),
    SeedRow("2X6X24_GDF_HF", "2X6X24 GDF/HF 2B", "Roof", "Rafters", "2X6X24", "GDF/HF", "2B", 25.68, "lf", Some([24.0, 6.0, 2.0])),
    SeedRow("2X6X22_GDF_HF", "2X6X22 GDF/HF 2B", "Roof", "Rafters", "2X6X22", "GDF/HF", "2B", 23.68, "lf", Some([22.0, 6.0, 2.0])),
    SeedRow("2X6X20_KD_HFIR_ROOF", "2X6X20 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X20", "KD H-FIR", "#2&BTR", 14.07, "lf", Some([20.0, 6.0, 2.0])),
    SeedRow("2X6X18_KD_HFIR_ROOF", "2X6X18 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X18", "KD H-FIR", "#2&BTR", 13.74, "lf", Some([18.0, 6.0, 2.0])),
    SeedRow("2X6X16_KD_HFIR_ROOF", "2X6X16 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X16", "KD H-FIR", "#2&BTR", 11.83, "lf", Some([16.0, 6.0, 2.0])),
    SeedRow("2X6X14_KD_HFIR_ROOF", "2X6X14 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X14", "KD H-FIR", "#2&BTR", 8.8, "lf", Some([14.0, 6.0, 2.0])),
    SeedRow("2X6X12_KD_HFIR_ROOF", "2X6X12 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X12", "KD H-FIR", "#2&BTR", 8.45, "lf", Some([12.0, 6.0, 2.0])),
    SeedRow("2X6X10_KD_HFIR_ROOF", "2X6X10 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X10", "KD H-FIR", "#2&BTR", 6.7, "lf", Some([10.0, 6.0, 2.0])),
    SeedRow("2X6X8_KD_HFIR_ROOF", "2X6X8 KD H-FIR #2&BTR", "Roof", "Rafters", "2X6X8", "KD H-FIR", "#2&BTR", 5.48, "lf", Some([8.0, 6.0, 2.0])),

    // Cornice and Decking
    SeedRow("OSB_8X6X16_TXT_LAP", "8X6X16 TXT OSBSMRT LAP", "Cornice and Decking", "Soffit", "8X6X16", "OSB", "TXT LAP", 10.96, "sheet", Some([16.0, 6.0, 0.75])),
    SeedRow("OSB_3/8X12X16_TXT_LAP", "3/8X12X16 TXT OSBSMRT LAP", "Cornice and Decking", "Soffit", "3/8X12X16", "OSB", "TXT LAP", 22.5, "sheet", Some([16.0, 12.0, 0.375])),
    SeedRow("OSB_3/8X4X8_TXT_SOFFIT", "3/8X4X8 TXT OSBSMRT SOFFIT", "Cornice and Decking", "Soffit", "3/8X4X8", "OSB", "TXT SOFFIT", 45.95, "sheet", Some([8.0, 4.0, 0.375])),
    SeedRow("OSB_3/8X16X16_SLD_SOFF", "3/8X16X16 SLD OSBSMRT SOFF", "Cornice and Decking", "Soffit", "3/8X16X16", "OSB", "SLD SOFF", 40.68, "sheet", Some([16.0, 16.0, 0.375])),
    SeedRow("UNDEREAVE_VENT_8X16_WHITE", "8X16 UNDEREAVE VENT WHITE", "Cornice and Decking", "Vents", "8X16", "PLASTIC", "WHITE", 2.62, "each", Some([1.0, 16.0, 8.0])),
    SeedRow("SIDING_CORNER_12_TEX_ALUM", "SIDING CORNER 12\" TEX ALUM", "Cornice and Decking", "Trim", "12\"", "ALUMINUM", "TEXTURED", 3.08, "lf", Some([1.0, 12.0, 0.125])),
    SeedRow("TRIM_4/4X2X16_TXT", "4/4X2X16 TXT OSBSMRT TRIM", "Cornice and Decking", "Trim", "4/4X2X16", "OSB", "TXT TRIM", 9.05, "lf", Some([16.0, 2.0, 1.0])),
    SeedRow("TRIM_4/4X4X16_TXT", "4/4X4X16 TXT OSBSMRT TRIM", "Cornice and Decking", "Trim", "4/4X4X16", "OSB", "TXT TRIM", 14.42, "lf", Some([16.0, 4.0, 1.0])),
    SeedRow("TRIM_4/4X8X16_TXT", "4/4X8X16 TXT OSBSMRT TRIM", "Cornice and Decking", "Trim", "4/4X8X16", "OSB", "TXT TRIM", 33.82, "lf", Some([16.0, 8.0, 1.0])),
    SeedRow("OSB_7/16X4X8_CORNICE", "7/16X4X8 OSB", "Cornice and Decking", "Sheathing", "7/16X4X8", "OSB", "STANDARD", 9.7, "sheet", Some([8.0, 4.0, 0.4375])),
    SeedRow("PSCA_7/16_250", "PSCA 7/16 (250)", "Cornice and Decking", "Fasteners", "7/16", "STEEL", "250 PACK", 0.07, "pack", None),

    // Post & Beams
    SeedRow("POST_6X6X12_GDF_RS", "6X6X12 GDF R/S", "Post & Beams", "Posts", "6X6X12", "GDF", "R/S", 125.16, "each", Some([12.0, 6.0, 6.0])),
    SeedRow("APB66R_6", "APB66R (6)", "Post & Beams", "Hardware", "APB66R", "STEEL", "6 PACK", 45.88, "pack", None),
    SeedRow("BEAM_8X8-20_DF", "8X8-20 DF", "Post & Beams", "Beams", "8X8-20", "DF", "STANDARD", 800.95, "each", Some([20.0, 8.0, 8.0])),
    SeedRow("BEAM_8X12-14_DF", "8X12-14 DF", "Post & Beams", "Beams", "8X12-14", "DF", "STANDARD", 560.66, "each", Some([14.0, 12.0, 8.0])),
    SeedRow("BEAM_8X12+10_DF", "8X12+10 DF", "Post & Beams", "Beams", "8X12+10", "DF", "STANDARD", 400.47, "each", Some([10.0, 12.0, 8.0])),
    SeedRow("BEAM_8X12_DF", "8X12 DF", "Post & Beams", "Beams", "8X12", "DF", "STANDARD", 320.38, "each", Some([12.0, 12.0, 8.0])),
];

fn positive(value: f64) -> Option<f64> {
    (value > 0.0).then_some(value)
}

pub fn seed_items() -> Vec<CatalogItem> {
    SEED.iter()
        .map(|row| {
            let [length, width, thickness] = row.9.unwrap_or([0.0; 3]);
            CatalogItem {
                item_id: row.0.to_string(),
                description: row.1.to_string(),
                category: row.2.to_string(),
                subcategory: row.3.to_string(),
                dimensions: row.4.to_string(),
                material: row.5.to_string(),
                grade: row.6.to_string(),
                unit_price: row.7,
                unit: row.8.to_string(),
                length_feet: positive(length),
                width_inches: positive(width),
                thickness_inches: positive(thickness),
            }
        })
        .collect()
}
