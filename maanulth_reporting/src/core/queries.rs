// @file: maanulth_reporting/src/core/queries.rs
// @description: BCGW SQL templates and their rendering for a reporting period.
// @author: LAS.

use crate::core::models::{Dataset, ReportingPeriod};


//
// TEMPLATE PLACEHOLDERS
//
// {y}    reporting year
// {prvy} previous year (start of the reporting window)
// {lus}  quoted list of Maa-nulth landscape unit names
// {tm}   quoted list of road map labels
//

const WINDOW: &str = "BETWEEN TO_DATE('01/09/{prvy}', 'DD/MM/YYYY') AND TO_DATE('31/08/{y}', 'DD/MM/YYYY')";

pub const LANDSCAPE_UNITS_SQL: &str = "
    SELECT ldw.LANDSCAPE_UNIT_NAME
    FROM WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldw
        JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
            ON SDO_RELATE(ldw.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
            AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'";

pub const LANDSCAPE_UNIT_COLUMN: &str = "LANDSCAPE_UNIT_NAME";

const FOREST_AUTH_SQL: &str = "
    SELECT
        frr.MAP_LABEL,
        frr.FILE_TYPE_DESCRIPTION,
        frr.FILE_STATUS_CODE,
        frr.FILE_TYPE_CODE,
        frr.LIFE_CYCLE_STATUS_CODE,
        frr.ISSUE_DATE,
        amdd.AMEND_STATUS_DATE AS AMEND_DATE,
        iha.TREATY_SIDE_AGREEMENT_ID AS IHA_ID,
        CASE WHEN amdd.AMEND_STATUS_DATE > frr.ISSUE_DATE + 5 THEN 'Amended' ELSE 'New' END AS NEW_AMEND,
        frr.CURRENT_EXPIRY_DATE_CALC,
        EXTRACT(YEAR FROM frr.CURRENT_EXPIRY_DATE_CALC) - EXTRACT(YEAR FROM frr.ISSUE_DATE) AS TENURE_LENGTH_YRS,
        ROUND(SDO_GEOM.SDO_AREA(frr.GEOMETRY, 0.005, 'unit=HECTARE'), 2) AS AREA_HA,
        CASE WHEN frr.ADMIN_DISTRICT_CODE = 'DSI' THEN 'South' ELSE 'North' END AS REGION,
        ldu.LANDSCAPE_UNIT_NAME AS LANDSCAPE_UNIT,
        SDO_UTIL.TO_WKTGEOMETRY(frr.GEOMETRY) AS SHAPE
    FROM WHSE_FOREST_TENURE.FTEN_HARVEST_AUTH_POLY_SVW frr
        JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
            ON SDO_RELATE(frr.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
            AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
        LEFT JOIN WHSE_LEGAL_ADMIN_BOUNDARIES.FNT_TREATY_SIDE_AGREEMENTS_SP iha
            ON SDO_RELATE(iha.GEOMETRY, frr.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND iha.AREA_TYPE = 'Important Harvest Area'
            AND iha.STATUS = 'ACTIVE'
        JOIN WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldu
            ON SDO_RELATE(ldu.GEOMETRY, frr.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND ldu.LANDSCAPE_UNIT_NAME IN ({lus})
        LEFT JOIN (
            WITH first_amend AS (
                SELECT
                    amd.FOREST_FILE_ID || ' ' || amd.CUTTING_PERMIT_ID AS MAP_LABEL,
                    amd.AMEND_STATUS_DATE,
                    ROW_NUMBER() OVER (PARTITION BY amd.FOREST_FILE_ID, amd.CUTTING_PERMIT_ID
                                       ORDER BY amd.AMEND_STATUS_DATE) AS rn
                FROM WHSE_FOREST_TENURE.FTEN_HARVEST_AMEND amd
                WHERE amd.AMEND_STATUS_DATE {window}
            )
            SELECT MAP_LABEL, AMEND_STATUS_DATE FROM first_amend WHERE rn = 1
        ) amdd
            ON amdd.MAP_LABEL = frr.MAP_LABEL
    WHERE frr.LIFE_CYCLE_STATUS_CODE = 'ACTIVE'
        AND (amdd.AMEND_STATUS_DATE {window}
             OR (frr.ISSUE_DATE {window} AND amdd.AMEND_STATUS_DATE IS NULL))
    ORDER BY frr.MAP_LABEL";

const FOREST_ROAD_SQL: &str = "
    SELECT
        ftr.MAP_LABEL,
        ftr.ROAD_SECTION_LENGTH AS ROAD_SECTION_LENGTH_KM,
        ftr.FILE_TYPE_CODE,
        ftr.FILE_TYPE_DESCRIPTION,
        ftr.FILE_STATUS_CODE,
        ftr.LIFE_CYCLE_STATUS_CODE,
        ftr.MAP_LABEL || ', Amendment ' || ftr.AMENDMENT_ID || ', Road Associated: ' || ftr.ROAD_SECTION_ID AS FILE_AMEND_SECTION,
        rd.ENTRY_TIMESTAMP,
        rd.UPDATE_TIMESTAMP,
        rd.CHANGE_TIMESTAMP4,
        ftr.AWARD_DATE,
        ftr.EXPIRY_DATE,
        iha.TREATY_SIDE_AGREEMENT_ID AS IHA_ID,
        EXTRACT(YEAR FROM ftr.EXPIRY_DATE) - EXTRACT(YEAR FROM ftr.AWARD_DATE) AS TENURE_LENGTH_YRS,
        CASE WHEN ftr.AWARD_DATE > rd.CHANGE_TIMESTAMP4 + 5 THEN 'New' ELSE 'Amended' END AS NEW_AMEND,
        CASE WHEN ftr.GEOGRAPHIC_DISTRICT_CODE = 'DSI' THEN 'South' ELSE 'North' END AS REGION,
        SDO_UTIL.TO_WKTGEOMETRY(rd.GEOMETRY) AS SHAPE
    FROM (
        SELECT
            rdd.ENTRY_TIMESTAMP,
            rdd.UPDATE_TIMESTAMP,
            rdd.REVISION_COUNT,
            rdd.RETIREMENT_DATE,
            rdd.CHANGE_TIMESTAMP4,
            rdd.UPDATE_USERID,
            rdd.FOREST_FILE_ID || ' ' || rdd.ROAD_SECTION_ID AS MAP_LABEL,
            rdd.GEOMETRY
        FROM WHSE_FOREST_TENURE.FTEN_ROAD_LINES rdd
            JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
                ON SDO_RELATE(rdd.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
                AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
    ) rd
        JOIN WHSE_FOREST_TENURE.FTEN_ROAD_SECTION_LINES_SVW ftr
            ON ftr.MAP_LABEL = rd.MAP_LABEL
        LEFT JOIN WHSE_LEGAL_ADMIN_BOUNDARIES.FNT_TREATY_SIDE_AGREEMENTS_SP iha
            ON SDO_RELATE(iha.GEOMETRY, ftr.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND iha.AREA_TYPE = 'Important Harvest Area'
            AND iha.STATUS = 'ACTIVE'
    WHERE ftr.LIFE_CYCLE_STATUS_CODE = 'ACTIVE'
        AND rd.RETIREMENT_DATE IS NULL
        AND (rd.UPDATE_USERID NOT LIKE '%DATAFIX%' AND rd.UPDATE_USERID NOT LIKE '%datafix%')
        AND (rd.CHANGE_TIMESTAMP4 {window} OR ftr.AWARD_DATE {window})
    ORDER BY ftr.MAP_LABEL";

const ROAD_LANDSCAPE_UNITS_SQL: &str = "
    SELECT
        ftr.MAP_LABEL,
        ldm.LANDSCAPE_UNIT_NAME AS LANDSCAPE_UNIT
    FROM WHSE_FOREST_TENURE.FTEN_ROAD_SECTION_LINES_SVW ftr
        JOIN (
            SELECT ldu.LANDSCAPE_UNIT_NAME, ldu.GEOMETRY
            FROM WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldu
                JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
                    ON SDO_RELATE(ldu.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
                    AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
        ) ldm
            ON SDO_RELATE(ftr.GEOMETRY, ldm.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
    WHERE ftr.MAP_LABEL IN ({tm})";

const SPEC_USE_SQL: &str = "
    SELECT
        supv.MAP_LABEL,
        ROUND(SDO_GEOM.SDO_AREA(supv.GEOMETRY, 0.005, 'unit=HECTARE'), 2) AS AREA_HA,
        supv.SPECIAL_USE_DESCRIPTION AS FILE_TYPE_DESCRIPTION,
        supv.FILE_STATUS_CODE,
        supv.AMENDMENT_ID,
        iha.TREATY_SIDE_AGREEMENT_ID AS IHA_ID,
        CASE WHEN supv.AMENDMENT_ID = 0 THEN 'New' ELSE 'Amended' END AS NEW_AMEND,
        supv.LIFE_CYCLE_STATUS_CODE,
        sup.ENTRY_TIMESTAMP,
        sup.ENTRY_TIMESTAMP AS ISSUE_DATE,
        sup.UPDATE_TIMESTAMP,
        CASE WHEN supv.ADMIN_DISTRICT_CODE = 'DSI' THEN 'South' ELSE 'North' END AS REGION,
        ldu.LANDSCAPE_UNIT_NAME AS LANDSCAPE_UNIT,
        SDO_UTIL.TO_WKTGEOMETRY(supv.GEOMETRY) AS SHAPE
    FROM WHSE_FOREST_TENURE.FTEN_SPEC_USE_PERMIT_POLY_SVW supv
        JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
            ON SDO_RELATE(supv.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
            AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
        JOIN WHSE_FOREST_TENURE.FTEN_SPEC_USE_PERMIT sup
            ON sup.FOREST_FILE_ID = supv.MAP_LABEL
        LEFT JOIN WHSE_LEGAL_ADMIN_BOUNDARIES.FNT_TREATY_SIDE_AGREEMENTS_SP iha
            ON SDO_RELATE(iha.GEOMETRY, supv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND iha.AREA_TYPE = 'Important Harvest Area'
            AND iha.STATUS = 'ACTIVE'
        JOIN WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldu
            ON SDO_RELATE(ldu.GEOMETRY, supv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND ldu.LANDSCAPE_UNIT_NAME IN ({lus})
    WHERE supv.LIFE_CYCLE_STATUS_CODE = 'ACTIVE'
        AND supv.RETIREMENT_DATE IS NULL
        AND (sup.UPDATE_USERID NOT LIKE '%DATAFIX%' AND sup.UPDATE_USERID NOT LIKE '%datafix%')
        AND sup.ENTRY_TIMESTAMP {window}
    ORDER BY supv.MAP_LABEL";

const RECR_POLY_SQL: &str = "
    SELECT
        rcp.MAP_LABEL,
        ROUND(SDO_GEOM.SDO_AREA(rcpv.GEOMETRY, 0.005, 'unit=HECTARE'), 2) AS AREA_HA,
        rcpv.FILE_STATUS_CODE,
        rcpv.PROJECT_TYPE,
        rcpv.LIFE_CYCLE_STATUS_CODE,
        rcpv.PROJECT_ESTABLISHED_DATE,
        iha.TREATY_SIDE_AGREEMENT_ID AS IHA_ID,
        CASE WHEN rcpv.PROJECT_ESTABLISHED_DATE >= rcp.CHANGE_TIMESTAMP3 THEN 'New' ELSE 'Amended' END AS NEW_AMEND,
        CASE WHEN rcpv.GEOGRAPHIC_DISTRICT_CODE = 'DSI' THEN 'South' ELSE 'North' END AS REGION,
        rcp.ENTRY_TIMESTAMP,
        rcp.UPDATE_TIMESTAMP,
        rcp.CHANGE_TIMESTAMP3,
        ldu.LANDSCAPE_UNIT_NAME AS LANDSCAPE_UNIT,
        SDO_UTIL.TO_WKTGEOMETRY(rcpv.GEOMETRY) AS SHAPE
    FROM (
        SELECT
            rcpp.FOREST_FILE_ID AS MAP_LABEL,
            rcpp.RETIREMENT_DATE,
            rcpp.ENTRY_USERID,
            rcpp.UPDATE_USERID,
            rcpp.ENTRY_TIMESTAMP,
            rcpp.UPDATE_TIMESTAMP,
            rcpp.CHANGE_TIMESTAMP3
        FROM WHSE_FOREST_TENURE.FTEN_RECREATION_POLY rcpp
            JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
                ON SDO_RELATE(rcpp.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
                AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
    ) rcp
        JOIN WHSE_FOREST_TENURE.FTEN_RECREATION_POLY_SVW rcpv
            ON rcp.MAP_LABEL = rcpv.FOREST_FILE_ID
        LEFT JOIN WHSE_LEGAL_ADMIN_BOUNDARIES.FNT_TREATY_SIDE_AGREEMENTS_SP iha
            ON SDO_RELATE(iha.GEOMETRY, rcpv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND iha.AREA_TYPE = 'Important Harvest Area'
            AND iha.STATUS = 'ACTIVE'
        JOIN WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldu
            ON SDO_RELATE(ldu.GEOMETRY, rcpv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND ldu.LANDSCAPE_UNIT_NAME IN ({lus})
    WHERE rcpv.LIFE_CYCLE_STATUS_CODE = 'ACTIVE'
        AND rcp.RETIREMENT_DATE IS NULL
        AND (rcp.UPDATE_USERID NOT LIKE '%DATAFIX%' AND rcp.UPDATE_USERID NOT LIKE '%datafix%')
        AND (rcp.CHANGE_TIMESTAMP3 {window} OR rcpv.PROJECT_ESTABLISHED_DATE {window})
    ORDER BY rcp.MAP_LABEL";

const RECR_LINE_SQL: &str = "
    SELECT
        rcp.MAP_LABEL,
        rcpv.FEATURE_LENGTH AS LENGTH_KM,
        rcpv.FILE_STATUS_CODE,
        rcpv.PROJECT_TYPE,
        rcpv.LIFE_CYCLE_STATUS_CODE,
        rcpv.PROJECT_ESTABLISHED_DATE,
        iha.TREATY_SIDE_AGREEMENT_ID AS IHA_ID,
        CASE WHEN rcpv.PROJECT_ESTABLISHED_DATE >= rcp.CHANGE_TIMESTAMP3 THEN 'New' ELSE 'Amended' END AS NEW_AMEND,
        CASE WHEN rcpv.DISTRICT_CODE = 'DSI' THEN 'South' ELSE 'North' END AS REGION,
        rcp.ENTRY_TIMESTAMP,
        rcp.UPDATE_TIMESTAMP,
        rcp.CHANGE_TIMESTAMP3,
        ldu.LANDSCAPE_UNIT_NAME AS LANDSCAPE_UNIT,
        SDO_UTIL.TO_WKTGEOMETRY(rcpv.GEOMETRY) AS SHAPE
    FROM (
        SELECT
            rcpp.FOREST_FILE_ID || ' ' || rcpp.SECTION_ID AS MAP_LABEL,
            rcpp.RETIREMENT_DATE,
            rcpp.ENTRY_USERID,
            rcpp.UPDATE_USERID,
            rcpp.ENTRY_TIMESTAMP,
            rcpp.UPDATE_TIMESTAMP,
            rcpp.CHANGE_TIMESTAMP3
        FROM WHSE_FOREST_TENURE.FTEN_RECREATION_LINE rcpp
            JOIN WHSE_ADMIN_BOUNDARIES.PIP_CONSULTATION_AREAS_SP pip
                ON SDO_RELATE(rcpp.GEOMETRY, pip.SHAPE, 'mask=ANYINTERACT') = 'TRUE'
                AND pip.CONTACT_ORGANIZATION_NAME = q'[Maa-nulth First Nations]'
    ) rcp
        JOIN WHSE_FOREST_TENURE.FTEN_RECREATION_LINES_SVW rcpv
            ON rcp.MAP_LABEL = rcpv.MAP_LABEL
        LEFT JOIN WHSE_LEGAL_ADMIN_BOUNDARIES.FNT_TREATY_SIDE_AGREEMENTS_SP iha
            ON SDO_RELATE(iha.GEOMETRY, rcpv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND iha.AREA_TYPE = 'Important Harvest Area'
            AND iha.STATUS = 'ACTIVE'
        JOIN WHSE_LAND_USE_PLANNING.RMP_LANDSCAPE_UNIT_SVW ldu
            ON SDO_RELATE(ldu.GEOMETRY, rcpv.GEOMETRY, 'mask=ANYINTERACT') = 'TRUE'
            AND ldu.LANDSCAPE_UNIT_NAME IN ({lus})
    WHERE rcpv.LIFE_CYCLE_STATUS_CODE = 'ACTIVE'
        AND rcp.RETIREMENT_DATE IS NULL
        AND (rcp.UPDATE_USERID NOT LIKE '%DATAFIX%' AND rcp.UPDATE_USERID NOT LIKE '%datafix%')
        AND (rcp.CHANGE_TIMESTAMP3 {window} OR rcpv.PROJECT_ESTABLISHED_DATE {window})
    ORDER BY rcp.MAP_LABEL";


//
// PUBLIC INTERFACE
//

pub fn template(dataset: Dataset) -> &'static str {
    match dataset {
        Dataset::ForestAuth => FOREST_AUTH_SQL,
        Dataset::ForestRoad => FOREST_ROAD_SQL,
        Dataset::SpecUse => SPEC_USE_SQL,
        Dataset::RecrPoly => RECR_POLY_SQL,
        Dataset::RecrLine => RECR_LINE_SQL,
    }
}

/// Renders a dataset query for the period, restricted to `landscape_units`.
pub fn render(dataset: Dataset, period: &ReportingPeriod, landscape_units: &[String]) -> String {
    template(dataset)
        .replace("{window}", WINDOW)
        .replace("{prvy}", &period.previous_year().to_string())
        .replace("{y}", &period.year().to_string())
        .replace("{lus}", &quote_list(landscape_units))
}

pub fn render_road_landscape_units(map_labels: &[String]) -> String {
    ROAD_LANDSCAPE_UNITS_SQL.replace("{tm}", &quote_list(map_labels))
}

/// Builds a SQL literal list; an empty list becomes NULL so `IN (NULL)` matches nothing.
pub fn quote_list(items: &[String]) -> String {
    if items.is_empty() {
        return "NULL".to_string();
    }
    items.iter()
        .map(|item| format!("'{}'", item.replace('\'', "''")))
        .collect::<Vec<String>>()
        .join(",")
}
